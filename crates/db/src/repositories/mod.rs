//! Database repositories.
//!
//! Thin data-access wrappers over the sea-orm entities. Repositories own no
//! business rules; validation and permission checks live in the service
//! layer.

mod campus;
mod complaint;
mod complaint_type;
mod progress_update;
mod role_assignment;
mod user;

pub use campus::CampusRepository;
pub use complaint::{ComplaintFilter, ComplaintRepository};
pub use complaint_type::ComplaintTypeRepository;
pub use progress_update::ProgressUpdateRepository;
pub use role_assignment::RoleAssignmentRepository;
pub use user::UserRepository;

//! Database entities.

pub mod campus;
pub mod complaint;
pub mod complaint_type;
pub mod progress_update;
pub mod role_assignment;
pub mod user;

pub use campus::Entity as Campus;
pub use complaint::Entity as Complaint;
pub use complaint_type::Entity as ComplaintType;
pub use progress_update::Entity as ProgressUpdate;
pub use role_assignment::Entity as RoleAssignment;
pub use user::Entity as User;

//! Business logic services.

#![allow(missing_docs)]

pub mod campus;
pub mod complaint;
pub mod complaint_type;
pub mod directory;
pub mod progress;
pub mod user;

pub use campus::CampusService;
pub use complaint::{
    AssignComplaintInput, ComplaintService, ComplaintStats, ListComplaintsInput,
    SubmitComplaintInput, UpdateStatusInput, UploadImage,
};
pub use complaint_type::ComplaintTypeService;
pub use directory::{AssignRoleInput, DirectoryService, UpdateRoleInput};
pub use progress::{CreateProgressInput, ProgressService};
pub use user::{CreateUserInput, UserService};

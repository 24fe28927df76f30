pub mod accounts;
pub mod assignments;
pub mod auth;
pub mod classrooms;
pub mod submissions;

pub use accounts::AccountService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classrooms::ClassroomService;
pub use submissions::SubmissionService;

pub mod accounts;

pub mod auth;

pub mod teachers;

pub mod students;

pub mod classrooms;

pub mod assignments;

pub mod submissions;

pub use assignments::configure_assignments_routes;
pub use auth::configure_auth_routes;
pub use classrooms::configure_classrooms_routes;
pub use students::configure_students_routes;
pub use submissions::configure_submissions_routes;
pub use teachers::configure_teachers_routes;

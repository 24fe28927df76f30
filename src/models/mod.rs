pub mod accounts;
pub mod assignments;
pub mod auth;
pub mod classrooms;
pub mod common;
pub mod submissions;

pub use common::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery, ValidationErrors,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

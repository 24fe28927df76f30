pub mod rate_limit;
pub mod token_auth;

pub use rate_limit::RateLimit;
pub use token_auth::TokenAuth;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

// 中间件短路时使用的统一错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

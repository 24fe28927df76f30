use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一信封
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("JSON payload error on {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
        other => format!("Invalid request body: {other}"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

/// 查询参数解析失败时返回统一信封
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Query error on {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 统一的 API 响应结构
///
/// 成功与失败都使用同一个信封：`{code, message, data?, timestamp}`。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl<T: TS + Serialize> ApiResponse<T> {
    /// 200 + 数据
    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::success(data, message))
    }

    /// 201 + 新建的资源
    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::success(data, message))
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

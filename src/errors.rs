//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 业务错误在 handler 边界被转换为统一的 JSON 错误响应。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_school_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolError {
            $($variant(String),)*
        }

        impl SchoolError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_school_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    Conflict("E007", "Conflict Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
    PasswordHash("E012", "Password Hash Error"),
}

impl SchoolError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SchoolError::Validation(_) => ErrorCode::ValidationFailed,
            SchoolError::Conflict(_) => ErrorCode::Conflict,
            SchoolError::NotFound(_) => ErrorCode::NotFound,
            SchoolError::Authentication(_) => ErrorCode::Unauthorized,
            SchoolError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for SchoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolError {}

impl ResponseError for SchoolError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchoolError::Validation(_) => StatusCode::BAD_REQUEST,
            SchoolError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SchoolError::Authorization(_) => StatusCode::FORBIDDEN,
            SchoolError::NotFound(_) => StatusCode::NOT_FOUND,
            SchoolError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ApiResponse::error_empty(self.error_code(), self.message()))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolError {
    fn from(err: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::warn!("Unique constraint violated: {detail}");
            return SchoolError::Conflict("Resource already exists".to_string());
        }
        SchoolError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolError {
    fn from(err: serde_json::Error) -> Self {
        SchoolError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolError>;

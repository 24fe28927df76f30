use std::collections::HashMap;

use actix_web::HttpResponse;

use crate::errors::SchoolError;
use crate::models::{ApiResponse, ErrorCode};

/// 字段级校验错误：字段名 -> 错误信息列表
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    fields: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// 合并另一个校验结果（例如来自 `validate_*` 工具函数的 `Err`）
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(msg) = result {
            self.add(field, msg);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// 400 响应，`data` 为字段错误表
    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ApiResponse::error(
            ErrorCode::ValidationFailed,
            self.fields.clone(),
            "Validation failed",
        ))
    }
}

impl From<ValidationErrors> for SchoolError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.fields.into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let detail = fields
            .into_iter()
            .map(|(field, msgs)| format!("{field}: {}", msgs.join("; ")))
            .collect::<Vec<_>>()
            .join(", ");
        SchoolError::Validation(detail)
    }
}

use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::{deserialize_optional_i64, deserialize_some};

// 提交列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub assignment: Option<i64>,
}

/// 创建/更新提交请求
///
/// 创建时 `score` 与 `accepted` 会被忽略；学生更新时同样忽略，
/// 教师只能修改 `score` 与 `accepted`。
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionRequest {
    pub assignment: Option<i64>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(type = "string | null")]
    pub attachment: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(type = "number | null")]
    pub score: Option<Option<i32>>,
    pub accepted: Option<bool>,
}

// 存储层使用的提交创建参数
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment: i64,
    pub attachment: Option<String>,
    pub notes: String,
    pub owner_student: i64,
}

// 存储层使用的提交更新参数，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct SubmissionUpdate {
    pub assignment: Option<i64>,
    pub notes: Option<String>,
    pub attachment: Option<Option<String>>,
    pub score: Option<Option<i32>>,
    pub accepted: Option<bool>,
}

/// 提交列表的可见范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionScope {
    /// 学生：只看自己的提交
    OwnedBy(i64),
    /// 教师：只看自己布置的作业下的提交
    GradedBy(i64),
}

// 存储层查询参数
#[derive(Debug, Clone)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub assignment: Option<i64>,
    pub scope: SubmissionScope,
}

impl SubmissionListQuery {
    pub fn from_params(params: SubmissionListParams, scope: SubmissionScope) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            assignment: params.assignment,
            scope,
        }
    }
}

use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::{deserialize_optional_i64, deserialize_some};

// 作业列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 按作业 ID 或教师 ID 精确匹配
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub classroom: Option<i64>,
}

/// 创建/更新作业请求
///
/// `owner_teacher` 不在请求中：创建时取当前登录的教师。
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// 附件文件名，将被转换为 uploads/attachments/... 引用
    pub attachment: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(type = "number | null")]
    pub classroom: Option<Option<i64>>,
    pub completed_by: Option<Vec<i64>>,
}

// 存储层使用的作业创建参数
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub attachment: String,
    pub classroom: Option<i64>,
    pub owner_teacher: i64,
    pub completed_by: Vec<i64>,
}

// 存储层使用的作业更新参数，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachment: Option<String>,
    pub classroom: Option<Option<i64>>,
    pub completed_by: Option<Vec<i64>>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub classroom: Option<i64>,
}

impl From<AssignmentListParams> for AssignmentListQuery {
    fn from(params: AssignmentListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            classroom: params.classroom,
        }
    }
}

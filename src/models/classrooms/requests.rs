use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

// 教室列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "classroom.ts")]
pub struct ClassroomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub owner_teacher: Option<i64>,
    pub search: Option<String>,
}

/// 创建/更新教室请求
///
/// `owner_teacher` 不在请求中：创建时取当前登录的教师。
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "classroom.ts")]
pub struct ClassroomRequest {
    pub class_name: Option<String>,
}

// 存储层查询参数
#[derive(Debug, Clone, Default)]
pub struct ClassroomListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub owner_teacher: Option<i64>,
    pub search: Option<String>,
}

impl From<ClassroomListParams> for ClassroomListQuery {
    fn from(params: ClassroomListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            owner_teacher: params.owner_teacher,
            search: params.search,
        }
    }
}

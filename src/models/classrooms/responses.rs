use serde::Serialize;
use ts_rs::TS;

use super::entities::Classroom;
use crate::models::common::PaginationInfo;

// 教室列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "classroom.ts")]
pub struct ClassroomListResponse {
    pub items: Vec<Classroom>,
    pub pagination: PaginationInfo,
}

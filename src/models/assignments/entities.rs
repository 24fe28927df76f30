use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub attachment: String,
    pub classroom: Option<i64>,
    pub owner_teacher: i64,
    /// 已完成该作业的学生 ID
    pub completed_by: Vec<i64>,
    pub date_created: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

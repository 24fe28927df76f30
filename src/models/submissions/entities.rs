use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 作业提交（assignment-completed 记录）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment: i64,
    /// 未评分时为 null，只能由作业所属教师设置
    pub score: Option<i32>,
    pub accepted: bool,
    pub attachment: Option<String>,
    pub notes: String,
    pub owner_student: i64,
    pub date_created: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

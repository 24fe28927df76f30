use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教室实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "classroom.ts")]
pub struct Classroom {
    pub id: i64,
    pub class_name: String,
    pub owner_teacher: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

//! 作业提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub score: Option<i32>,
    pub accepted: bool,
    pub attachment: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub owner_student_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::OwnerStudentId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    OwnerStudent,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerStudent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::Submission;
        use chrono::{DateTime, Utc};

        Submission {
            id: self.id,
            assignment: self.assignment_id,
            score: self.score,
            accepted: self.accepted,
            attachment: self.attachment,
            notes: self.notes,
            owner_student: self.owner_student_id,
            date_created: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

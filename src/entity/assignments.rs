//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub attachment: String,
    pub classroom_id: Option<i64>,
    pub owner_teacher_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classrooms::Entity",
        from = "Column::ClassroomId",
        to = "super::classrooms::Column::Id",
        on_delete = "Cascade"
    )]
    Classroom,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::OwnerTeacherId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    OwnerTeacher,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
    #[sea_orm(has_many = "super::assignment_completions::Entity")]
    Completions,
}

impl Related<super::classrooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerTeacher.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::assignment_completions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Completions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型，completed_by 由存储层单独查询
impl Model {
    pub fn into_assignment(
        self,
        completed_by: Vec<i64>,
    ) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::Assignment;
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            title: self.title,
            description: self.description,
            attachment: self.attachment,
            classroom: self.classroom_id,
            owner_teacher: self.owner_teacher_id,
            completed_by,
            date_created: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

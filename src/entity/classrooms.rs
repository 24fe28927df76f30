//! 教室实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_name: String,
    pub owner_teacher_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::OwnerTeacherId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    OwnerTeacher,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerTeacher.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_classroom(self) -> crate::models::classrooms::entities::Classroom {
        use crate::models::classrooms::entities::Classroom;
        use chrono::{DateTime, Utc};

        Classroom {
            id: self.id,
            class_name: self.class_name,
            owner_teacher: self.owner_teacher_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

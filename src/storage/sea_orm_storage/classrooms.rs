//! 教室存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    classrooms::{
        entities::Classroom, requests::ClassroomListQuery, responses::ClassroomListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建教室
    pub async fn create_classroom_impl(
        &self,
        owner_teacher: i64,
        class_name: String,
    ) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_name: Set(class_name),
            owner_teacher_id: Set(owner_teacher),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建教室失败"))?;

        Ok(result.into_classroom())
    }

    /// 通过 ID 获取教室
    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询教室失败"))?;

        Ok(result.map(|m| m.into_classroom()))
    }

    /// 分页列出教室
    pub async fn list_classrooms_with_pagination_impl(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Classrooms::find();

        if let Some(owner_teacher) = query.owner_teacher {
            select = select.filter(Column::OwnerTeacherId.eq(owner_teacher));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::ClassName.like(like_contains(search.trim())));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询教室总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询教室页数失败"))?;
        let classrooms = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询教室列表失败"))?;

        Ok(ClassroomListResponse {
            items: classrooms.into_iter().map(|m| m.into_classroom()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新教室（所有者不可修改）
    pub async fn update_classroom_impl(
        &self,
        id: i64,
        class_name: Option<String>,
    ) -> Result<Option<Classroom>> {
        let Some(existing) = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询教室失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(class_name) = class_name {
            model.class_name = Set(class_name);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新教室失败"))?;

        Ok(Some(updated.into_classroom()))
    }

    /// 删除教室，作业与提交由外键级联删除
    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除教室失败"))?;

        Ok(result.rows_affected > 0)
    }
}

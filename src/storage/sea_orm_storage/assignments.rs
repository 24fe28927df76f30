//! 作业存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, db_error};
use crate::entity::assignment_completions::{
    ActiveModel as CompletionActiveModel, Column as CompletionColumn,
    Entity as AssignmentCompletions,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, AssignmentUpdate, NewAssignment},
        responses::AssignmentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 批量读取完成名单：作业 ID -> 学生 ID 列表（升序）
async fn load_completed_by<C: ConnectionTrait>(
    db: &C,
    assignment_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
    if assignment_ids.is_empty() {
        return Ok(map);
    }

    let rows = AssignmentCompletions::find()
        .filter(CompletionColumn::AssignmentId.is_in(assignment_ids.iter().copied()))
        .order_by_asc(CompletionColumn::StudentId)
        .all(db)
        .await
        .map_err(db_error("查询完成名单失败"))?;

    for row in rows {
        map.entry(row.assignment_id).or_default().push(row.student_id);
    }
    Ok(map)
}

/// 用新名单替换旧名单
async fn replace_completed_by<C: ConnectionTrait>(
    db: &C,
    assignment_id: i64,
    student_ids: &[i64],
) -> Result<()> {
    AssignmentCompletions::delete_many()
        .filter(CompletionColumn::AssignmentId.eq(assignment_id))
        .exec(db)
        .await
        .map_err(db_error("清空完成名单失败"))?;

    let mut ids = student_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }

    let rows = ids.into_iter().map(|student_id| CompletionActiveModel {
        assignment_id: Set(assignment_id),
        student_id: Set(student_id),
    });
    AssignmentCompletions::insert_many(rows)
        .exec_without_returning(db)
        .await
        .map_err(db_error("写入完成名单失败"))?;

    Ok(())
}

impl SeaOrmStorage {
    /// 创建作业（作业与完成名单在同一事务内写入）
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            attachment: Set(req.attachment),
            classroom_id: Set(req.classroom),
            owner_teacher_id: Set(req.owner_teacher),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model.insert(&txn).await.map_err(db_error("创建作业失败"))?;
        replace_completed_by(&txn, created.id, &req.completed_by).await?;
        let mut completed = load_completed_by(&txn, &[created.id]).await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        let completed_by = completed.remove(&created.id).unwrap_or_default();
        Ok(created.into_assignment(completed_by))
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let Some(model) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询作业失败"))?
        else {
            return Ok(None);
        };

        let mut completed = load_completed_by(&self.db, &[id]).await?;
        Ok(Some(
            model.into_assignment(completed.remove(&id).unwrap_or_default()),
        ))
    }

    /// 分页列出作业
    ///
    /// `search` 为数字时精确匹配作业 ID 或教师 ID，否则没有结果。
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Assignments::find();

        if let Some(classroom) = query.classroom {
            select = select.filter(Column::ClassroomId.eq(classroom));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            match search.trim().parse::<i64>() {
                Ok(id) => {
                    select = select.filter(
                        Condition::any()
                            .add(Column::Id.eq(id))
                            .add(Column::OwnerTeacherId.eq(id)),
                    );
                }
                Err(_) => {
                    return Ok(AssignmentListResponse {
                        items: Vec::new(),
                        pagination: PaginationInfo {
                            page: page as i64,
                            page_size: size as i64,
                            total: 0,
                            total_pages: 0,
                        },
                    });
                }
            }
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询作业总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询作业页数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询作业列表失败"))?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut completed = load_completed_by(&self.db, &ids).await?;

        Ok(AssignmentListResponse {
            items: models
                .into_iter()
                .map(|m| {
                    let completed_by = completed.remove(&m.id).unwrap_or_default();
                    m.into_assignment(completed_by)
                })
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新作业（所有者不可修改）
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = Assignments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询作业失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(attachment) = update.attachment {
            model.attachment = Set(attachment);
        }
        if let Some(classroom) = update.classroom {
            model.classroom_id = Set(classroom);
        }

        let updated = model.update(&txn).await.map_err(db_error("更新作业失败"))?;

        if let Some(ref completed_by) = update.completed_by {
            replace_completed_by(&txn, id, completed_by).await?;
        }
        let mut completed = load_completed_by(&txn, &[id]).await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(
            updated.into_assignment(completed.remove(&id).unwrap_or_default()),
        ))
    }

    /// 删除作业，提交与完成名单由外键级联删除
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除作业失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::{entities::AccountRole, requests::NewAccount};

    async fn account(storage: &SeaOrmStorage, username: &str, role: AccountRole) -> i64 {
        storage
            .create_account_impl(NewAccount {
                username: username.into(),
                password_hash: "hash".into(),
                first_name: None,
                last_name: None,
                profile_pic: None,
                role,
                is_staff: false,
                is_superuser: false,
            })
            .await
            .expect("account")
            .id
    }

    fn new_assignment(owner: i64, classroom: Option<i64>, completed_by: Vec<i64>) -> NewAssignment {
        NewAssignment {
            title: "HW1".into(),
            description: String::new(),
            attachment: "uploads/attachments/hw1.pdf".into(),
            classroom,
            owner_teacher: owner,
            completed_by,
        }
    }

    #[tokio::test]
    async fn test_completed_by_is_replaced() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let t1 = account(&storage, "t1", AccountRole::Teacher).await;
        let s1 = account(&storage, "s1", AccountRole::Student).await;
        let s2 = account(&storage, "s2", AccountRole::Student).await;

        let created = storage
            .create_assignment_impl(new_assignment(t1, None, vec![s2, s1, s1]))
            .await
            .expect("create");
        assert_eq!(created.completed_by, vec![s1, s2]);
        assert_eq!(created.owner_teacher, t1);

        let updated = storage
            .update_assignment_impl(
                created.id,
                AssignmentUpdate {
                    completed_by: Some(vec![s2]),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(updated.completed_by, vec![s2]);
        assert_eq!(updated.title, "HW1");

        // 未提供名单时保持不变
        let untouched = storage
            .update_assignment_impl(
                created.id,
                AssignmentUpdate {
                    title: Some("HW1b".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(untouched.completed_by, vec![s2]);
    }

    #[tokio::test]
    async fn test_search_by_id_or_owner() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let t1 = account(&storage, "t1", AccountRole::Teacher).await;
        let t2 = account(&storage, "t2", AccountRole::Teacher).await;
        let a1 = storage
            .create_assignment_impl(new_assignment(t1, None, vec![]))
            .await
            .expect("a1");
        storage
            .create_assignment_impl(new_assignment(t2, None, vec![]))
            .await
            .expect("a2");

        let by_owner = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                search: Some(t2.to_string()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert!(by_owner.items.iter().all(|a| a.owner_teacher == t2 || a.id == t2));

        let by_id = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                search: Some(a1.id.to_string()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert!(by_id.items.iter().any(|a| a.id == a1.id));

        let none = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                search: Some("algebra".into()),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(none.pagination.total, 0);
    }
}

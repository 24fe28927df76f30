//! 作业提交存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionListQuery, SubmissionScope, SubmissionUpdate},
        responses::SubmissionListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建提交（未评分、未通过）
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(req.assignment),
            score: Set(None),
            accepted: Set(false),
            attachment: Set(req.attachment),
            notes: Set(req.notes),
            owner_student_id: Set(req.owner_student),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建提交失败"))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分页列出当前账号可见的提交
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = match query.scope {
            SubmissionScope::OwnedBy(student_id) => {
                Submissions::find().filter(Column::OwnerStudentId.eq(student_id))
            }
            SubmissionScope::GradedBy(teacher_id) => Submissions::find()
                .inner_join(Assignments)
                .filter(AssignmentColumn::OwnerTeacherId.eq(teacher_id)),
        };

        if let Some(assignment) = query.assignment {
            select = select.filter(Column::AssignmentId.eq(assignment));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询提交总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询提交页数失败"))?;
        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询提交列表失败"))?;

        Ok(SubmissionListResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新提交，字段取舍由服务层按角色决定
    pub async fn update_submission_impl(
        &self,
        id: i64,
        update: SubmissionUpdate,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询提交失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(assignment) = update.assignment {
            model.assignment_id = Set(assignment);
        }
        if let Some(notes) = update.notes {
            model.notes = Set(notes);
        }
        if let Some(attachment) = update.attachment {
            model.attachment = Set(attachment);
        }
        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(accepted) = update.accepted {
            model.accepted = Set(accepted);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新提交失败"))?;

        Ok(Some(updated.into_submission()))
    }

    pub async fn delete_submission_impl(&self, id: i64) -> Result<bool> {
        let result = Submissions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除提交失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::{entities::AccountRole, requests::NewAccount};
    use crate::models::assignments::requests::NewAssignment;

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

    async fn assignment(storage: &SeaOrmStorage, owner: i64, classroom: Option<i64>) -> i64 {
        storage
            .create_assignment_impl(NewAssignment {
                title: "HW1".into(),
                description: String::new(),
                attachment: "uploads/attachments/hw1.pdf".into(),
                classroom,
                owner_teacher: owner,
                completed_by: vec![],
            })
            .await
            .expect("assignment")
            .id
    }

    async fn submission(storage: &SeaOrmStorage, assignment: i64, student: i64) -> i64 {
        storage
            .create_submission_impl(NewSubmission {
                assignment,
                attachment: None,
                notes: "done".into(),
                owner_student: student,
            })
            .await
            .expect("submission")
            .id
    }

    #[tokio::test]
    async fn test_classroom_delete_cascades() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let t1 = account(&storage, "t1", AccountRole::Teacher).await;
        let s1 = account(&storage, "s1", AccountRole::Student).await;
        let classroom = storage
            .create_classroom_impl(t1, "Algebra".into())
            .await
            .expect("classroom");

        let inside = assignment(&storage, t1, Some(classroom.id)).await;
        let outside = assignment(&storage, t1, None).await;
        let inside_sub = submission(&storage, inside, s1).await;
        let outside_sub = submission(&storage, outside, s1).await;

        assert!(storage.delete_classroom_impl(classroom.id).await.expect("delete"));

        assert!(storage.get_assignment_by_id_impl(inside).await.expect("query").is_none());
        assert!(storage.get_submission_by_id_impl(inside_sub).await.expect("query").is_none());
        assert!(storage.get_assignment_by_id_impl(outside).await.expect("query").is_some());
        assert!(storage.get_submission_by_id_impl(outside_sub).await.expect("query").is_some());
    }

    #[tokio::test]
    async fn test_list_scope() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let t1 = account(&storage, "t1", AccountRole::Teacher).await;
        let t2 = account(&storage, "t2", AccountRole::Teacher).await;
        let s1 = account(&storage, "s1", AccountRole::Student).await;
        let s2 = account(&storage, "s2", AccountRole::Student).await;

        let a1 = assignment(&storage, t1, None).await;
        let a2 = assignment(&storage, t2, None).await;
        submission(&storage, a1, s1).await;
        submission(&storage, a2, s1).await;
        submission(&storage, a1, s2).await;

        let list = |scope| SubmissionListQuery {
            page: None,
            size: None,
            assignment: None,
            scope,
        };

        let mine = storage
            .list_submissions_with_pagination_impl(list(SubmissionScope::OwnedBy(s1)))
            .await
            .expect("list");
        assert_eq!(mine.pagination.total, 2);
        assert!(mine.items.iter().all(|s| s.owner_student == s1));

        let graded = storage
            .list_submissions_with_pagination_impl(list(SubmissionScope::GradedBy(t1)))
            .await
            .expect("list");
        assert_eq!(graded.pagination.total, 2);
        assert!(graded.items.iter().all(|s| s.assignment == a1));

        let none = storage
            .list_submissions_with_pagination_impl(list(SubmissionScope::GradedBy(s2)))
            .await
            .expect("list");
        assert_eq!(none.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_grading_update() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let t1 = account(&storage, "t1", AccountRole::Teacher).await;
        let s1 = account(&storage, "s1", AccountRole::Student).await;
        let a1 = assignment(&storage, t1, None).await;
        let id = submission(&storage, a1, s1).await;

        let graded = storage
            .update_submission_impl(
                id,
                SubmissionUpdate {
                    score: Some(Some(90)),
                    accepted: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(graded.score, Some(90));
        assert!(graded.accepted);
        assert_eq!(graded.notes, "done");

        let cleared = storage
            .update_submission_impl(
                id,
                SubmissionUpdate {
                    score: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("exists");
        assert_eq!(cleared.score, None);
    }
}

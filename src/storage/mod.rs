use std::sync::Arc;

use crate::models::{
    accounts::{
        entities::{Account, AccountRole},
        requests::{AccountListQuery, AccountUpdate, NewAccount},
        responses::AccountListResponse,
    },
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, AssignmentUpdate, NewAssignment},
        responses::AssignmentListResponse,
    },
    classrooms::{
        entities::Classroom, requests::ClassroomListQuery, responses::ClassroomListResponse,
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionListQuery, SubmissionUpdate},
        responses::SubmissionListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建账号（密码已哈希）
    async fn create_account(&self, account: NewAccount) -> Result<Account>;
    // 通过ID获取账号（不区分角色）
    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>>;
    // 通过用户名获取账号
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;
    // 在指定角色范围内获取账号
    async fn get_scoped_account(&self, role: AccountRole, id: i64) -> Result<Option<Account>>;
    // 在指定角色范围内分页列出账号
    async fn list_accounts_with_pagination(
        &self,
        role: AccountRole,
        query: AccountListQuery,
    ) -> Result<AccountListResponse>;
    // 更新账号信息
    async fn update_account(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>>;
    // 启用/停用账号
    async fn set_account_active(&self, id: i64, active: bool) -> Result<bool>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计超级用户数量
    async fn count_superusers(&self) -> Result<u64>;
    // 从给定 ID 中筛出确实是学生的账号
    async fn filter_student_ids(&self, ids: &[i64]) -> Result<Vec<i64>>;

    /// 登录令牌方法
    // 获取账号已有令牌，没有则签发新令牌
    async fn get_or_create_token(&self, account_id: i64) -> Result<String>;
    // 通过令牌获取账号
    async fn get_account_by_token(&self, key: &str) -> Result<Option<Account>>;
    // 获取账号当前令牌
    async fn get_token_by_account_id(&self, account_id: i64) -> Result<Option<String>>;
    // 吊销账号令牌，返回被删除的令牌
    async fn delete_token(&self, account_id: i64) -> Result<Option<String>>;

    /// 教室管理方法
    async fn create_classroom(&self, owner_teacher: i64, class_name: String) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    async fn update_classroom(
        &self,
        id: i64,
        class_name: Option<String>,
    ) -> Result<Option<Classroom>>;
    // 删除教室（级联删除其作业与提交）
    async fn delete_classroom(&self, id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>>;
    // 删除作业（级联删除提交与完成名单）
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 提交管理方法
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    async fn update_submission(
        &self,
        id: i64,
        update: SubmissionUpdate,
    ) -> Result<Option<Submission>>;
    async fn delete_submission(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

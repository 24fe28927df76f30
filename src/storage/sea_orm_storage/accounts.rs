//! 账号存储操作
//!
//! 教师与学生共用 `accounts` 表，`teachers()` / `students()` 是按角色过滤的查询入口。

use super::{SeaOrmStorage, db_error};
use crate::entity::accounts::{ActiveModel, Column, Entity as Accounts};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    accounts::{
        entities::{Account, AccountRole},
        requests::{AccountListQuery, AccountUpdate, NewAccount},
        responses::AccountListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

/// 所有教师账号
pub fn teachers() -> Select<Accounts> {
    by_role(AccountRole::Teacher)
}

/// 所有学生账号
pub fn students() -> Select<Accounts> {
    by_role(AccountRole::Student)
}

fn by_role(role: AccountRole) -> Select<Accounts> {
    Accounts::find().filter(Column::Role.eq(role.as_str()))
}

impl SeaOrmStorage {
    /// 创建账号
    pub async fn create_account_impl(&self, req: NewAccount) -> Result<Account> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            profile_pic: Set(req.profile_pic),
            role: Set(req.role.to_string()),
            password_hash: Set(req.password_hash),
            is_active: Set(true),
            is_staff: Set(req.is_staff),
            is_superuser: Set(req.is_superuser),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建账号失败"))?;

        Ok(result.into_account())
    }

    /// 通过 ID 获取账号
    pub async fn get_account_by_id_impl(&self, id: i64) -> Result<Option<Account>> {
        let result = Accounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询账号失败"))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 通过用户名获取账号
    pub async fn get_account_by_username_impl(&self, username: &str) -> Result<Option<Account>> {
        let result = Accounts::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_error("查询账号失败"))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 在角色范围内获取账号，角色不符视为不存在
    pub async fn get_scoped_account_impl(
        &self,
        role: AccountRole,
        id: i64,
    ) -> Result<Option<Account>> {
        let result = by_role(role)
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(db_error("查询账号失败"))?;

        Ok(result.map(|m| m.into_account()))
    }

    /// 分页列出某一角色的账号
    pub async fn list_accounts_with_pagination_impl(
        &self,
        role: AccountRole,
        query: AccountListQuery,
    ) -> Result<AccountListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = by_role(role);

        // 教师只按用户名搜索，学生额外支持姓名
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            let mut condition = Condition::any().add(Column::Username.like(like_contains(search)));
            if role == AccountRole::Student {
                condition = condition
                    .add(Column::FirstName.like(like_contains(search)))
                    .add(Column::LastName.like(like_contains(search)));
            }
            select = select.filter(condition);
        }

        select = select
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询账号总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询账号页数失败"))?;
        let accounts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询账号列表失败"))?;

        Ok(AccountListResponse {
            items: accounts.into_iter().map(|m| m.into_account()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新账号信息（角色不可修改）
    pub async fn update_account_impl(
        &self,
        id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>> {
        let Some(existing) = Accounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询账号失败"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(username) = update.username {
            model.username = Set(username);
        }
        if let Some(password_hash) = update.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(profile_pic) = update.profile_pic {
            model.profile_pic = Set(Some(profile_pic));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新账号失败"))?;

        Ok(Some(updated.into_account()))
    }

    /// 启用/停用账号
    pub async fn set_account_active_impl(&self, id: i64, active: bool) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Accounts::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(active))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新账号状态失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Accounts::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新最后登录时间失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_superusers_impl(&self) -> Result<u64> {
        Accounts::find()
            .filter(Column::IsSuperuser.eq(true))
            .count(&self.db)
            .await
            .map_err(db_error("统计超级用户失败"))
    }

    /// 从给定 ID 中筛出学生账号
    pub async fn filter_student_ids_impl(&self, ids: &[i64]) -> Result<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        students()
            .select_only()
            .column(Column::Id)
            .filter(Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_error("查询学生失败"))
    }
}

//! 账号服务
//!
//! 教师与学生共用同一套实现，`role` 决定查询范围和新账号的角色。

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::accounts::entities::AccountRole;
use crate::models::accounts::requests::{
    AccountListParams, CreateAccountRequest, UpdateAccountRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::permissions::{Policy, PolicySet};
use crate::storage::Storage;

/// 除注册外的账号接口：必须登录，只能修改自己
pub(crate) const ACCOUNT_POLICIES: PolicySet =
    PolicySet::new(&[Policy::Authenticated, Policy::SelfOrReadOnly]);

pub struct AccountService {
    role: AccountRole,
    storage: Option<Arc<dyn Storage>>,
}

impl AccountService {
    pub fn new_lazy(role: AccountRole) -> Self {
        Self {
            role,
            storage: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn role(&self) -> AccountRole {
        self.role
    }

    pub(crate) fn not_found(&self) -> HttpResponse {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AccountNotFound,
            format!("{} not found", self.role.label()),
        ))
    }

    pub(crate) fn username_taken() -> HttpResponse {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AccountAlreadyExists,
            "A user with that username already exists",
        ))
    }

    // 分页列出账号
    pub async fn list_accounts(
        &self,
        request: &HttpRequest,
        query: AccountListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_accounts(self, request, query).await
    }

    // 注册账号（角色由服务决定）
    pub async fn create_account(
        &self,
        request: &HttpRequest,
        create_data: CreateAccountRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_account(self, request, create_data).await
    }

    pub async fn get_account(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_account(self, request, id).await
    }

    // 仅返回头像引用
    pub async fn get_profile_pic(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_profile_pic(self, request, id).await
    }

    // PUT 为整体更新，PATCH 为部分更新
    pub async fn update_account(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateAccountRequest,
        partial: bool,
    ) -> ActixResult<HttpResponse> {
        update::update_account(self, request, id, update_data, partial).await
    }

    // 停用账号
    pub async fn delete_account(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_account(self, request, id).await
    }
}

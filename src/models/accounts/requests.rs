use serde::Deserialize;
use ts_rs::TS;

use super::entities::AccountRole;
use crate::models::common::PaginationQuery;

// 账号列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct AccountListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

/// 注册请求
///
/// 不包含 `role` 字段：角色只由请求路径（/teachers 或 /students）决定，
/// 客户端传入的 `role` 会被直接忽略。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct CreateAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// 头像文件名，将被转换为 uploads/profiles/... 引用
    pub profile_pic: Option<String>,
}

/// 账号更新请求（PUT 要求 username 与 password，PATCH 任意子集）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_pic: Option<String>,
}

// 存储层使用的账号创建参数（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_pic: Option<String>,
    pub role: AccountRole,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// 存储层使用的账号更新参数，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_pic: Option<String>,
}

// 账号列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AccountListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<AccountListParams> for AccountListQuery {
    fn from(params: AccountListParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}

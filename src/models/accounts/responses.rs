use serde::Serialize;
use ts_rs::TS;

use super::entities::Account;
use crate::models::common::PaginationInfo;

// 账号列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct AccountListResponse {
    pub items: Vec<Account>,
    pub pagination: PaginationInfo,
}

// 头像引用响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "account.ts")]
pub struct ProfilePicResponse {
    pub id: i64,
    pub profile_pic: Option<String>,
}

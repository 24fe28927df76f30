use serde::Serialize;
use ts_rs::TS;

use crate::models::accounts::entities::Account;

// 登录响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginResponse {
    /// 不透明令牌，请求时放在 `Authorization: Token <token>` 中
    pub token: String,
    pub account: Account,
}

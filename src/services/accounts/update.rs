use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ACCOUNT_POLICIES, AccountService};
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse, ValidationErrors,
    accounts::requests::{AccountUpdate, UpdateAccountRequest},
};
use crate::permissions::Target;
use crate::utils::blob_path::profile_pic_ref;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    NAME_MAX_LEN, required_message, validate_max_len, validate_password, validate_username,
};

pub async fn update_account(
    service: &AccountService,
    request: &HttpRequest,
    id: i64,
    update_data: UpdateAccountRequest,
    partial: bool,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ACCOUNT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let Some(account) = storage.get_scoped_account(service.role(), id).await? else {
        return Ok(service.not_found());
    };
    ACCOUNT_POLICIES.check_object(actor.as_ref(), request.method(), &Target::Account(&account))?;

    // 字段校验
    let mut errors = ValidationErrors::new();
    match &update_data.username {
        Some(username) => errors.check("username", validate_username(username)),
        None if !partial => errors.add("username", required_message()),
        None => {}
    }
    match &update_data.password {
        Some(password) => errors.check("password", validate_password(password)),
        None if !partial => errors.add("password", required_message()),
        None => {}
    }
    if let Some(first_name) = &update_data.first_name {
        errors.check("first_name", validate_max_len(first_name, NAME_MAX_LEN));
    }
    if let Some(last_name) = &update_data.last_name {
        errors.check("last_name", validate_max_len(last_name, NAME_MAX_LEN));
    }

    // 头像路径以更新后的用户名为准
    let effective_username = update_data
        .username
        .as_deref()
        .unwrap_or(&account.username);
    let profile_pic = match update_data.profile_pic.as_deref() {
        Some(raw) => match profile_pic_ref(service.role(), effective_username, raw) {
            Ok(reference) => Some(reference),
            Err(msg) => {
                errors.add("profile_pic", msg);
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    // 用户名变更时检查冲突
    if let Some(username) = &update_data.username
        && username != &account.username
        && storage.get_account_by_username(username).await?.is_some()
    {
        return Ok(AccountService::username_taken());
    }

    let password_hash = match &update_data.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let update = AccountUpdate {
        username: update_data.username,
        password_hash,
        first_name: update_data.first_name,
        last_name: update_data.last_name,
        profile_pic,
    };

    match storage.update_account(id, update).await? {
        Some(updated) => {
            // 令牌缓存中的账号已过期
            if let Some(token) = storage.get_token_by_account_id(id).await? {
                TokenAuth::evict(request, &token).await;
            }
            info!("{} account {} updated", service.role().label(), updated.id);
            Ok(ApiResponse::ok(
                updated,
                format!("{} updated successfully", service.role().label()),
            ))
        }
        None => Ok(service.not_found()),
    }
}

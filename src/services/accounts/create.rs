use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AccountService;
use crate::models::{
    ApiResponse, ValidationErrors,
    accounts::requests::{CreateAccountRequest, NewAccount},
};
use crate::utils::blob_path::profile_pic_ref;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    NAME_MAX_LEN, required_message, validate_max_len, validate_password, validate_username,
};

/// 注册账号
///
/// 对匿名请求开放。角色只取决于调用的是教师还是学生接口。
pub async fn create_account(
    service: &AccountService,
    request: &HttpRequest,
    create_data: CreateAccountRequest,
) -> ActixResult<HttpResponse> {
    let role = service.role();
    let mut errors = ValidationErrors::new();

    let username = create_data.username.unwrap_or_default();
    let password = create_data.password.unwrap_or_default();

    if username.is_empty() {
        errors.add("username", required_message());
    } else {
        errors.check("username", validate_username(&username));
    }
    if password.is_empty() {
        errors.add("password", required_message());
    } else {
        errors.check("password", validate_password(&password));
    }
    if let Some(first_name) = &create_data.first_name {
        errors.check("first_name", validate_max_len(first_name, NAME_MAX_LEN));
    }
    if let Some(last_name) = &create_data.last_name {
        errors.check("last_name", validate_max_len(last_name, NAME_MAX_LEN));
    }

    let profile_pic = match create_data.profile_pic.as_deref() {
        Some(raw) => match profile_pic_ref(role, &username, raw) {
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

    let storage = service.get_storage(request);

    // 用户名全局唯一（不区分角色）
    if storage.get_account_by_username(&username).await?.is_some() {
        return Ok(AccountService::username_taken());
    }

    let account = storage
        .create_account(NewAccount {
            username,
            password_hash: hash_password(&password)?,
            first_name: create_data.first_name,
            last_name: create_data.last_name,
            profile_pic,
            role,
            is_staff: false,
            is_superuser: false,
        })
        .await?;

    info!(
        "{} account {} created with ID {}",
        role.label(),
        account.username,
        account.id
    );

    Ok(ApiResponse::created(
        account,
        format!("{} created successfully", role.label()),
    ))
}

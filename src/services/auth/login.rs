use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::utils::password::{verify_dummy_password, verify_password};

use super::AuthService;

// 不区分用户名不存在、密码错误与账号停用
fn login_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Unable to log in with provided credentials",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 根据用户名获取账号
    let account = match storage
        .get_account_by_username(&login_request.username)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            verify_dummy_password(&login_request.password);
            info!("Login failed: unknown username {}", login_request.username);
            return Ok(login_failed());
        }
        Err(e) => {
            error!("Login failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed",
                )),
            );
        }
    };

    // 2. 校验密码与账号状态（停用账号也完整校验一次）
    let password_ok = verify_password(&login_request.password, &account.password_hash);
    if !account.is_active || !password_ok {
        info!("Login failed for account {}", account.username);
        return Ok(login_failed());
    }

    // 3. 获取或签发令牌
    let token = storage.get_or_create_token(account.id).await?;

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(account.id).await {
        warn!("Failed to update last login for {}: {}", account.id, e);
    }

    info!("Account {} logged in successfully", account.username);

    Ok(ApiResponse::ok(
        LoginResponse { token, account },
        "Login successful",
    ))
}

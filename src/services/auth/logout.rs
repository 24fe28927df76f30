use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::middlewares::TokenAuth;
use crate::models::ApiResponse;
use crate::permissions::{Policy, PolicySet};

use super::AuthService;

const LOGOUT_POLICIES: PolicySet = PolicySet::new(&[Policy::Authenticated]);

/// 吊销当前账号的令牌，之后使用该令牌的请求返回 401
pub async fn handle_logout(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    LOGOUT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    if let Some(account) = actor {
        if let Some(token) = storage.delete_token(account.id).await? {
            TokenAuth::evict(request, &token).await;
        }
        info!("Account {} logged out", account.username);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logout successful")))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ACCOUNT_POLICIES, AccountService};
use crate::middlewares::TokenAuth;
use crate::models::ApiResponse;
use crate::permissions::Target;

/// 账号不做物理删除：停用并吊销令牌
pub async fn delete_account(
    service: &AccountService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ACCOUNT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let Some(account) = storage.get_scoped_account(service.role(), id).await? else {
        return Ok(service.not_found());
    };
    ACCOUNT_POLICIES.check_object(actor.as_ref(), request.method(), &Target::Account(&account))?;

    if !storage.set_account_active(id, false).await? {
        return Ok(service.not_found());
    }
    if let Some(token) = storage.delete_token(id).await? {
        TokenAuth::evict(request, &token).await;
    }

    info!(
        "{} account {} deactivated",
        service.role().label(),
        account.username
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(format!(
        "{} deactivated successfully",
        service.role().label()
    ))))
}

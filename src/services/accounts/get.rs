use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ACCOUNT_POLICIES, AccountService};
use crate::middlewares::TokenAuth;
use crate::models::{ApiResponse, accounts::responses::ProfilePicResponse};
use crate::permissions::Target;

pub async fn get_account(
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

    Ok(ApiResponse::ok(
        account,
        format!("{} retrieved successfully", service.role().label()),
    ))
}

pub async fn get_profile_pic(
    service: &AccountService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ACCOUNT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    match storage.get_scoped_account(service.role(), id).await? {
        Some(account) => Ok(ApiResponse::ok(
            ProfilePicResponse {
                id: account.id,
                profile_pic: account.profile_pic,
            },
            "Profile picture retrieved successfully",
        )),
        None => Ok(service.not_found()),
    }
}

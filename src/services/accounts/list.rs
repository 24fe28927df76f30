use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ACCOUNT_POLICIES, AccountService};
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse,
    accounts::requests::{AccountListParams, AccountListQuery},
};

pub async fn list_accounts(
    service: &AccountService,
    request: &HttpRequest,
    query: AccountListParams,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ACCOUNT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let response = storage
        .list_accounts_with_pagination(service.role(), AccountListQuery::from(query))
        .await?;

    Ok(ApiResponse::ok(
        response,
        format!("{} list retrieved successfully", service.role().label()),
    ))
}

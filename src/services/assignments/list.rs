use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ASSIGNMENT_POLICIES, AssignmentService};
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentListParams, AssignmentListQuery},
};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ASSIGNMENT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let response = storage
        .list_assignments_with_pagination(AssignmentListQuery::from(query))
        .await?;

    Ok(ApiResponse::ok(
        response,
        "Assignment list retrieved successfully",
    ))
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ASSIGNMENT_POLICIES, AssignmentService};
use crate::middlewares::TokenAuth;
use crate::models::ApiResponse;
use crate::permissions::Target;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ASSIGNMENT_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let Some(assignment) = storage.get_assignment_by_id(assignment_id).await? else {
        return Ok(AssignmentService::not_found());
    };
    ASSIGNMENT_POLICIES.check_object(
        actor.as_ref(),
        request.method(),
        &Target::Assignment(&assignment),
    )?;

    Ok(ApiResponse::ok(
        assignment,
        "Assignment retrieved successfully",
    ))
}

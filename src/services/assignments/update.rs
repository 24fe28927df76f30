use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ASSIGNMENT_POLICIES, AssignmentService, validate_assignment};
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentRequest, AssignmentUpdate},
};
use crate::permissions::Target;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update_data: AssignmentRequest,
    partial: bool,
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

    let (errors, attachment) = validate_assignment(storage.as_ref(), &update_data, partial).await?;
    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    let update = AssignmentUpdate {
        title: update_data.title,
        description: update_data.description,
        attachment,
        // PUT 未给出 classroom 时视为清空
        classroom: match update_data.classroom {
            None if !partial => Some(None),
            other => other,
        },
        completed_by: match update_data.completed_by {
            None if !partial => Some(Vec::new()),
            other => other,
        },
    };

    match storage.update_assignment(assignment_id, update).await? {
        Some(updated) => {
            info!("Assignment {} updated", updated.id);
            Ok(ApiResponse::ok(
                updated,
                "Assignment updated successfully",
            ))
        }
        None => Ok(AssignmentService::not_found()),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ASSIGNMENT_POLICIES, AssignmentService, validate_assignment};
use crate::errors::SchoolError;
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentRequest, NewAssignment},
};

/// 创建作业，所属教师取自当前账号，忽略客户端传入的 owner
pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_data: AssignmentRequest,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    ASSIGNMENT_POLICIES.check_request(actor.as_ref(), request.method())?;
    let owner = actor
        .ok_or_else(|| SchoolError::authentication("Authentication credentials were not provided"))?;

    let storage = service.get_storage(request);
    let (errors, attachment) = validate_assignment(storage.as_ref(), &assignment_data, false).await?;
    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    let assignment = storage
        .create_assignment(NewAssignment {
            title: assignment_data.title.unwrap_or_default(),
            description: assignment_data.description.unwrap_or_default(),
            attachment: attachment.unwrap_or_default(),
            classroom: assignment_data.classroom.flatten(),
            owner_teacher: owner.id,
            completed_by: assignment_data.completed_by.unwrap_or_default(),
        })
        .await?;

    info!(
        "Assignment {} ({}) created by teacher {}",
        assignment.id, assignment.title, owner.id
    );

    Ok(ApiResponse::created(
        assignment,
        "Assignment created successfully",
    ))
}

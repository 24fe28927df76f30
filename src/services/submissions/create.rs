use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SUBMISSION_POLICIES, SubmissionService};
use crate::errors::SchoolError;
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse, ValidationErrors,
    submissions::requests::{NewSubmission, SubmissionRequest},
};
use crate::utils::blob_path::attachment_ref;
use crate::utils::validate::{NOTES_MAX_LEN, required_message, validate_max_len};

/// 学生提交作业
///
/// 提交者取自当前账号；score 与 accepted 由评分教师设置，创建时忽略客户端传值。
pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_data: SubmissionRequest,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    SUBMISSION_POLICIES.check_request(actor.as_ref(), request.method())?;
    let owner = actor
        .ok_or_else(|| SchoolError::authentication("Authentication credentials were not provided"))?;

    let storage = service.get_storage(request);
    let mut errors = ValidationErrors::new();

    match submission_data.assignment {
        Some(assignment_id) => {
            if storage.get_assignment_by_id(assignment_id).await?.is_none() {
                errors.add(
                    "assignment",
                    format!("Invalid pk \"{assignment_id}\" - object does not exist"),
                );
            }
        }
        None => errors.add("assignment", required_message()),
    }
    if let Some(notes) = &submission_data.notes {
        errors.check("notes", validate_max_len(notes, NOTES_MAX_LEN));
    }
    let attachment = match submission_data.attachment.flatten() {
        Some(raw) => match attachment_ref(&raw) {
            Ok(reference) => Some(reference),
            Err(msg) => {
                errors.add("attachment", msg);
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    let submission = storage
        .create_submission(NewSubmission {
            assignment: submission_data.assignment.unwrap_or_default(),
            attachment,
            notes: submission_data.notes.unwrap_or_default(),
            owner_student: owner.id,
        })
        .await?;

    info!(
        "Submission {} for assignment {} created by student {}",
        submission.id, submission.assignment, owner.id
    );

    Ok(ApiResponse::created(
        submission,
        "Submission created successfully",
    ))
}

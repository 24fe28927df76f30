use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SUBMISSION_POLICIES, SubmissionService, load_submission};
use crate::errors::SchoolError;
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse, ValidationErrors,
    submissions::requests::{SubmissionRequest, SubmissionUpdate},
};
use crate::permissions::Target;
use crate::utils::blob_path::attachment_ref;
use crate::utils::validate::{NOTES_MAX_LEN, required_message, validate_max_len};

/// 更新提交
///
/// - 提交者：只能修改 assignment、notes、attachment
/// - 评分教师：只能修改 score、accepted
///
/// 其余字段被忽略。
pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    update_data: SubmissionRequest,
    partial: bool,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    SUBMISSION_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let Some((submission, assignment)) = load_submission(storage.as_ref(), submission_id).await?
    else {
        return Ok(SubmissionService::not_found());
    };
    SUBMISSION_POLICIES.check_object(
        actor.as_ref(),
        request.method(),
        &Target::Submission {
            submission: &submission,
            assignment: &assignment,
        },
    )?;
    let actor = actor
        .ok_or_else(|| SchoolError::authentication("Authentication credentials were not provided"))?;

    let mut errors = ValidationErrors::new();
    let update = if actor.id == submission.owner_student {
        match update_data.assignment {
            Some(assignment_id) => {
                if storage.get_assignment_by_id(assignment_id).await?.is_none() {
                    errors.add(
                        "assignment",
                        format!("Invalid pk \"{assignment_id}\" - object does not exist"),
                    );
                }
            }
            None if !partial => errors.add("assignment", required_message()),
            None => {}
        }
        if let Some(notes) = &update_data.notes {
            errors.check("notes", validate_max_len(notes, NOTES_MAX_LEN));
        }
        let attachment = match update_data.attachment {
            Some(Some(raw)) => match attachment_ref(&raw) {
                Ok(reference) => Some(Some(reference)),
                Err(msg) => {
                    errors.add("attachment", msg);
                    None
                }
            },
            Some(None) => Some(None),
            None if !partial => Some(None),
            None => None,
        };

        SubmissionUpdate {
            assignment: update_data.assignment,
            notes: match update_data.notes {
                None if !partial => Some(String::new()),
                other => other,
            },
            attachment,
            ..Default::default()
        }
    } else {
        // 走到这里的只能是评分教师（策略已限定为 PATCH）
        SubmissionUpdate {
            score: update_data.score,
            accepted: update_data.accepted,
            ..Default::default()
        }
    };

    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    let grading = update.score.is_some() || update.accepted.is_some();
    match storage.update_submission(submission_id, update).await? {
        Some(updated) => {
            if grading {
                info!(
                    "Submission {} graded by teacher {}: score={:?}, accepted={}",
                    updated.id, actor.id, updated.score, updated.accepted
                );
            }
            Ok(ApiResponse::ok(
                updated,
                "Submission updated successfully",
            ))
        }
        None => Ok(SubmissionService::not_found()),
    }
}

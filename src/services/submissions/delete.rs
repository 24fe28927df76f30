use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SUBMISSION_POLICIES, SubmissionService, load_submission};
use crate::middlewares::TokenAuth;
use crate::models::ApiResponse;
use crate::permissions::Target;

pub async fn delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
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

    if !storage.delete_submission(submission_id).await? {
        return Ok(SubmissionService::not_found());
    }

    info!(
        "Submission {} deleted by student {}",
        submission_id, submission.owner_student
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Submission deleted successfully",
    )))
}

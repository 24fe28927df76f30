use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SUBMISSION_POLICIES, SubmissionService};
use crate::errors::SchoolError;
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse,
    submissions::requests::{SubmissionListParams, SubmissionListQuery, SubmissionScope},
};

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    SUBMISSION_POLICIES.check_request(actor.as_ref(), request.method())?;
    let actor = actor
        .ok_or_else(|| SchoolError::authentication("Authentication credentials were not provided"))?;

    // 列表只包含当前账号能在对象级看到的提交
    let scope = if actor.is_teacher() {
        SubmissionScope::GradedBy(actor.id)
    } else {
        SubmissionScope::OwnedBy(actor.id)
    };

    let storage = service.get_storage(request);
    let response = storage
        .list_submissions_with_pagination(SubmissionListQuery::from_params(query, scope))
        .await?;

    Ok(ApiResponse::ok(
        response,
        "Submission list retrieved successfully",
    ))
}

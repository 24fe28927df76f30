//! 作业提交服务（assignments-completed）
//!
//! 学生管理自己的提交；作业所属教师可以查看并通过 PATCH 评分。

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::{SubmissionListParams, SubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::permissions::{Policy, PolicySet};
use crate::storage::Storage;

pub(crate) const SUBMISSION_POLICIES: PolicySet = PolicySet::new(&[
    Policy::Authenticated,
    Policy::SubmissionOwnerOrGradingTeacher,
]);

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn not_found() -> HttpResponse {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))
    }

    // 获取提交列表（学生看自己的，教师看自己作业下的）
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, query).await
    }

    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        submission_data: SubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, submission_data).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_submission(self, request, submission_id).await
    }

    // 学生修改内容，教师评分
    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        update_data: SubmissionRequest,
        partial: bool,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, submission_id, update_data, partial).await
    }

    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, submission_id).await
    }
}

/// 取出提交及其作业，任一不存在返回 None
pub(crate) async fn load_submission(
    storage: &dyn Storage,
    submission_id: i64,
) -> Result<Option<(Submission, Assignment)>> {
    let Some(submission) = storage.get_submission_by_id(submission_id).await? else {
        return Ok(None);
    };
    let assignment = storage.get_assignment_by_id(submission.assignment).await?;
    Ok(assignment.map(|assignment| (submission, assignment)))
}

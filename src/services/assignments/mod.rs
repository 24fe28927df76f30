pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentRequest};
use crate::models::{ApiResponse, ErrorCode, ValidationErrors};
use crate::permissions::{Policy, PolicySet};
use crate::storage::Storage;
use crate::utils::blob_path::attachment_ref;
use crate::utils::validate::{
    DESCRIPTION_MAX_LEN, TITLE_MAX_LEN, required_message, validate_max_len,
    validate_required_text,
};

/// 任何人可读；只有教师能创建；只有所属教师能修改和删除
pub(crate) const ASSIGNMENT_POLICIES: PolicySet = PolicySet::new(&[
    Policy::AuthenticatedOrReadOnly,
    Policy::TeacherOrReadOnly,
    Policy::OwnerTeacherOrReadOnly,
]);

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))
    }

    // 获取作业列表
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, query).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        assignment_data: AssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, assignment_data).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, request, assignment_id).await
    }

    // PUT 为整体更新，PATCH 为部分更新
    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_data: AssignmentRequest,
        partial: bool,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update_data, partial).await
    }

    // 删除作业（级联删除提交）
    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }
}

/// 校验作业字段，`partial` 为 false 时 title 与 attachment 必填
///
/// 返回转换后的附件引用。
pub(crate) async fn validate_assignment(
    storage: &dyn Storage,
    data: &AssignmentRequest,
    partial: bool,
) -> Result<(ValidationErrors, Option<String>)> {
    let mut errors = ValidationErrors::new();

    match &data.title {
        Some(title) => errors.check("title", validate_required_text(title, TITLE_MAX_LEN)),
        None if !partial => errors.add("title", required_message()),
        None => {}
    }
    if let Some(description) = &data.description {
        errors.check(
            "description",
            validate_max_len(description, DESCRIPTION_MAX_LEN),
        );
    }

    let attachment = match data.attachment.as_deref() {
        Some(raw) => match attachment_ref(raw) {
            Ok(reference) => Some(reference),
            Err(msg) => {
                errors.add("attachment", msg);
                None
            }
        },
        None => {
            if !partial {
                errors.add("attachment", "No file was submitted");
            }
            None
        }
    };

    if let Some(Some(classroom_id)) = data.classroom
        && storage.get_classroom_by_id(classroom_id).await?.is_none()
    {
        errors.add(
            "classroom",
            format!("Invalid pk \"{classroom_id}\" - object does not exist"),
        );
    }

    if let Some(ids) = &data.completed_by
        && !ids.is_empty()
    {
        let students = storage.filter_student_ids(ids).await?;
        for id in ids.iter().filter(|id| !students.contains(id)) {
            errors.add(
                "completed_by",
                format!("Invalid pk \"{id}\" - object does not exist"),
            );
        }
    }

    Ok((errors, attachment))
}

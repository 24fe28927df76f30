pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classrooms::requests::{ClassroomListParams, ClassroomRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::permissions::{Policy, PolicySet};
use crate::storage::Storage;

/// 任何人可读；只有教师能创建；只有所属教师能修改和删除
pub(crate) const CLASSROOM_POLICIES: PolicySet = PolicySet::new(&[
    Policy::AuthenticatedOrReadOnly,
    Policy::TeacherOrReadOnly,
    Policy::OwnerTeacherOrReadOnly,
]);

pub struct ClassroomService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassroomService {
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
            ErrorCode::ClassroomNotFound,
            "Classroom not found",
        ))
    }

    // 获取教室列表
    pub async fn list_classrooms(
        &self,
        request: &HttpRequest,
        query: ClassroomListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classrooms(self, request, query).await
    }

    pub async fn create_classroom(
        &self,
        request: &HttpRequest,
        classroom_data: ClassroomRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_classroom(self, request, classroom_data).await
    }

    pub async fn get_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_classroom(self, request, classroom_id).await
    }

    // 更新教室信息
    pub async fn update_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        update_data: ClassroomRequest,
        partial: bool,
    ) -> ActixResult<HttpResponse> {
        update::update_classroom(self, request, classroom_id, update_data, partial).await
    }

    // 删除教室（级联删除作业）
    pub async fn delete_classroom(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_classroom(self, request, classroom_id).await
    }
}

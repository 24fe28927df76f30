use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{SubmissionListParams, SubmissionRequest};
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// HTTP处理程序
pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

pub async fn create_submission(
    req: HttpRequest,
    submission_data: web::Json<SubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, submission_data.into_inner())
        .await
}

pub async fn get_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, submission_id.0)
        .await
}

pub async fn replace_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    update_data: web::Json<SubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, submission_id.0, update_data.into_inner(), false)
        .await
}

// 学生部分更新或教师评分
pub async fn patch_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    update_data: web::Json<SubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_submission(&req, submission_id.0, update_data.into_inner(), true)
        .await
}

pub async fn delete_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .delete_submission(&req, submission_id.0)
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments-completed")
            .wrap(middlewares::TokenAuth)
            .service(
                web::resource("")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(create_submission)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::put().to(replace_submission))
                    .route(web::patch().to(patch_submission))
                    .route(web::delete().to(delete_submission)),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CLASSROOM_POLICIES, ClassroomService};
use crate::middlewares::TokenAuth;
use crate::models::ApiResponse;
use crate::permissions::Target;

pub async fn delete_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    CLASSROOM_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let Some(classroom) = storage.get_classroom_by_id(classroom_id).await? else {
        return Ok(ClassroomService::not_found());
    };
    CLASSROOM_POLICIES.check_object(
        actor.as_ref(),
        request.method(),
        &Target::Classroom(&classroom),
    )?;

    if !storage.delete_classroom(classroom_id).await? {
        return Ok(ClassroomService::not_found());
    }

    info!(
        "Classroom {} deleted by teacher {}",
        classroom_id, classroom.owner_teacher
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Classroom deleted successfully",
    )))
}

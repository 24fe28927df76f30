use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CLASSROOM_POLICIES, ClassroomService};
use crate::middlewares::TokenAuth;
use crate::models::{
    ApiResponse,
    classrooms::requests::{ClassroomListParams, ClassroomListQuery},
};

pub async fn list_classrooms(
    service: &ClassroomService,
    request: &HttpRequest,
    query: ClassroomListParams,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    CLASSROOM_POLICIES.check_request(actor.as_ref(), request.method())?;

    let storage = service.get_storage(request);
    let response = storage
        .list_classrooms_with_pagination(ClassroomListQuery::from(query))
        .await?;

    Ok(ApiResponse::ok(
        response,
        "Classroom list retrieved successfully",
    ))
}

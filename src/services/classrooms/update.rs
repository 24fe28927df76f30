use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CLASSROOM_POLICIES, ClassroomService};
use crate::middlewares::TokenAuth;
use crate::models::{ApiResponse, ValidationErrors, classrooms::requests::ClassroomRequest};
use crate::permissions::Target;
use crate::utils::validate::{CLASS_NAME_MAX_LEN, required_message, validate_required_text};

pub async fn update_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_id: i64,
    update_data: ClassroomRequest,
    partial: bool,
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

    let mut errors = ValidationErrors::new();
    match &update_data.class_name {
        Some(name) => errors.check(
            "class_name",
            validate_required_text(name, CLASS_NAME_MAX_LEN),
        ),
        None if !partial => errors.add("class_name", required_message()),
        None => {}
    }
    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    match storage
        .update_classroom(classroom_id, update_data.class_name)
        .await?
    {
        Some(classroom) => Ok(ApiResponse::ok(
            classroom,
            "Classroom updated successfully",
        )),
        None => Ok(ClassroomService::not_found()),
    }
}

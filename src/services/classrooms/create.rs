use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CLASSROOM_POLICIES, ClassroomService};
use crate::errors::SchoolError;
use crate::middlewares::TokenAuth;
use crate::models::{ApiResponse, ValidationErrors, classrooms::requests::ClassroomRequest};
use crate::utils::validate::{CLASS_NAME_MAX_LEN, required_message, validate_required_text};

pub async fn create_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    classroom_data: ClassroomRequest,
) -> ActixResult<HttpResponse> {
    let actor = TokenAuth::extract_account(request);
    CLASSROOM_POLICIES.check_request(actor.as_ref(), request.method())?;
    let owner = actor
        .ok_or_else(|| SchoolError::authentication("Authentication credentials were not provided"))?;

    let mut errors = ValidationErrors::new();
    match &classroom_data.class_name {
        Some(name) => errors.check(
            "class_name",
            validate_required_text(name, CLASS_NAME_MAX_LEN),
        ),
        None => errors.add("class_name", required_message()),
    }
    if !errors.is_empty() {
        return Ok(errors.to_response());
    }

    let storage = service.get_storage(request);
    let class_name = classroom_data.class_name.unwrap_or_default();
    let classroom = storage.create_classroom(owner.id, class_name).await?;

    info!(
        "Classroom {} ({}) created by teacher {}",
        classroom.id, classroom.class_name, owner.id
    );

    Ok(ApiResponse::created(
        classroom,
        "Classroom created successfully",
    ))
}

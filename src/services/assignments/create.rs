use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{AssignmentService, MAX_TITLE_LEN, check_question_ids};
use crate::middlewares::{RequireJWT, require_class_role::resolve_class_role};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::classes::entities::ClassRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_name;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    mut assignment: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    if let Err(msg) = validate_name(&assignment.title, MAX_TITLE_LEN) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;

    // 只能在自己的班级里布置作业
    let class = match storage.get_class_by_id(assignment.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load class: {e}"
            )));
        }
    };
    match resolve_class_role(&storage, &profile, &class).await {
        Ok(Some(ClassRole::Owner)) => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You can only create assignments in your own classes",
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to check class permission: {e}"
            )));
        }
    }

    if let Err(resp) = check_question_ids(&storage, &assignment.question_ids).await {
        return Ok(resp);
    }

    assignment.created_by = profile.id;
    match storage.create_assignment(assignment).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created in class {} by profile {}",
                assignment.id, assignment.class_id, profile.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => {
            error!("Assignment creation failed: {}", e);
            Ok(crate::services::internal_error("Assignment creation failed"))
        }
    }
}

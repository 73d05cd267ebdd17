use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::access::load_assignment_access;
use super::{AssignmentService, MAX_TITLE_LEN};
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_name;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    update: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = update.title.as_deref()
        && let Err(msg) = validate_name(title, MAX_TITLE_LEN)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = access.require_owner() {
        return Ok(resp);
    }

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(assignment)) => {
            info!(
                "Assignment {} updated by profile {} (status: {})",
                assignment.id, access.profile.id, assignment.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Assignment updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Assignment update failed: {e}"
        ))),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::AssignmentService;
use super::access::load_assignment_access;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let access = match load_assignment_access(&storage, request, assignment_id).await {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = access.require_owner() {
        return Ok(resp);
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => {
            warn!(
                "Assignment {} ({}) deleted by profile {}",
                assignment_id, access.assignment.title, access.profile.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Assignment deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Assignment deletion failed: {e}"
        ))),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassMemberService;
use crate::middlewares::RequireClassRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn remove_member(
    service: &ClassMemberService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(ctx) = RequireClassRole::extract_class_context(request) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )));
    };

    let storage = service.get_storage(request)?;
    match storage.remove_class_member(ctx.class.id, student_id).await {
        Ok(true) => {
            info!("Student {} removed from class {}", student_id, ctx.class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Member removed successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassMemberNotFound,
            "Student is not a member of this class",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to remove member: {e}"
        ))),
    }
}

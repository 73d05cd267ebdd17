use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::ClassService;
use crate::middlewares::RequireClassRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(ctx) = RequireClassRole::extract_class_context(request) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )));
    };

    let storage = service.get_storage(request)?;
    match storage.delete_class(ctx.class.id).await {
        Ok(true) => {
            // 成员、作业和评分记录随班级级联删除
            warn!("Class {} ({}) deleted", ctx.class.id, ctx.class.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Class deletion failed: {e}"
        ))),
    }
}

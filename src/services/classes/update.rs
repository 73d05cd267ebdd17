use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, MAX_CLASS_NAME_LEN};
use crate::middlewares::RequireClassRole;
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_name;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let Some(ctx) = RequireClassRole::extract_class_context(request) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )));
    };

    if let Some(name) = update_data.name.as_deref()
        && let Err(msg) = validate_name(name, MAX_CLASS_NAME_LEN)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;
    match storage.update_class(ctx.class.id, update_data).await {
        Ok(Some(class)) => {
            info!("Class {} updated", class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                class,
                "Class updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Class update failed: {e}"
        ))),
    }
}

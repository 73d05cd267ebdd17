use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::middlewares::RequireClassRole;
use crate::models::classes::entities::ClassRole;
use crate::models::classes::responses::ClassDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_class(service: &ClassService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(ctx) = RequireClassRole::extract_class_context(request) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )));
    };

    let mut class = ctx.class;
    // 邀请码只给班级所属教师看
    if ctx.role != ClassRole::Owner {
        class.invite_code.clear();
    }

    let storage = service.get_storage(request)?;
    match storage.count_class_members(class.id).await {
        Ok(member_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassDetailResponse {
                class,
                member_count,
            },
            "Class information retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to count class members: {e}"
        ))),
    }
}

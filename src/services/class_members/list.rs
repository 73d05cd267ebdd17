use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassMemberService;
use crate::middlewares::RequireClassRole;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};

pub async fn list_members(
    service: &ClassMemberService,
    request: &HttpRequest,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let Some(ctx) = RequireClassRole::extract_class_context(request) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )));
    };

    let storage = service.get_storage(request)?;
    match storage
        .list_class_members_with_pagination(ctx.class.id, query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class members retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to retrieve class members: {e}"
        ))),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::{RequireJWT, require_class_role::resolve_class_role};
use crate::models::assignments::requests::{AssignmentListQuery, AssignmentQueryParams};
use crate::models::classes::entities::ClassRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentQueryParams,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };
    let storage = service.get_storage(request)?;

    let class = match storage.get_class_by_id(query.class_id).await {
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

    let role = match resolve_class_role(&storage, &profile, &class).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You are not a member of this class",
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to check class membership: {e}"
            )));
        }
    };

    let list_query = AssignmentListQuery {
        pagination: query.pagination,
        class_id: class.id,
        published_only: role == ClassRole::Student,
        search: query.search,
    };

    match storage.list_assignments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignment list retrieved successfully",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to retrieve assignment list: {e}"
        ))),
    }
}

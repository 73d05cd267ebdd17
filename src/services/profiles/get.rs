use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_profile(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(current) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    // 扩展中的资料可能来自缓存，这里以数据库为准
    let storage = service.get_storage(request)?;
    match storage.get_profile_by_id(current.id).await {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            profile,
            "Profile retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProfileNotFound,
            "Profile not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Failed to load profile: {e}"
        ))),
    }
}

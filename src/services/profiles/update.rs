use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{error, info};

use super::ProfileService;
use crate::cache::ObjectCache;
use crate::middlewares::{RequireJWT, require_jwt::profile_cache_key};
use crate::models::{ApiResponse, ErrorCode, profiles::requests::UpdateProfileRequest};
use crate::utils::validate::validate_name;

const MAX_FULL_NAME_LEN: usize = 100;

pub async fn update_profile(
    service: &ProfileService,
    request: &HttpRequest,
    update: UpdateProfileRequest,
) -> ActixResult<HttpResponse> {
    let Some(current) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    if let Some(name) = update.full_name.as_deref().filter(|n| !n.trim().is_empty())
        && let Err(msg) = validate_name(name, MAX_FULL_NAME_LEN)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;
    match storage.update_profile(current.id, update).await {
        Ok(Some(profile)) => {
            // 认证中间件按 auth_uid 缓存资料，更新后需要失效
            if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
                cache.remove(&profile_cache_key(&profile.auth_uid)).await;
            }
            info!("Profile {} updated", profile.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                profile,
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProfileNotFound,
            "Profile not found",
        ))),
        Err(e) => {
            error!("Failed to update profile {}: {}", current.id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ProfileUpdateFailed,
                    "Failed to update profile",
                )),
            )
        }
    }
}

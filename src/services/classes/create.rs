use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{ClassService, MAX_CLASS_NAME_LEN};
use crate::middlewares::RequireJWT;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::profiles::entities::{Profile, ProfileRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    if let Err(msg) = validate_name(&class_data.name, MAX_CLASS_NAME_LEN) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;

    // 权限校验，并确定班级所属教师
    match resolve_teacher_id(&profile, class_data.teacher_id, &storage).await {
        Ok(teacher_id) => class_data.teacher_id = Some(teacher_id),
        Err(resp) => return Ok(resp),
    }

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!(
                "Class {} ({}) created by profile {}",
                class.id, class.name, profile.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                class,
                "Class created successfully",
            )))
        }
        Err(e) => {
            error!("Class creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ClassCreationFailed,
                    "Class creation failed",
                )),
            )
        }
    }
}

/// 教师只能为自己建班；管理员必须指定一名教师
async fn resolve_teacher_id(
    profile: &Profile,
    requested: Option<i64>,
    storage: &Arc<dyn Storage>,
) -> Result<i64, HttpResponse> {
    match profile.role {
        ProfileRole::Teacher => match requested {
            Some(id) if id != profile.id => Err(HttpResponse::Forbidden().json(
                ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "You do not have permission to create a class for another teacher",
                ),
            )),
            _ => Ok(profile.id),
        },
        ProfileRole::Admin => {
            let Some(teacher_id) = requested else {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "teacher_id is required",
                )));
            };
            match storage.get_profile_by_id(teacher_id).await {
                Ok(Some(teacher)) if teacher.role.is_staff() => Ok(teacher.id),
                Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "Admin can only create classes for teachers",
                ))),
                Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::ProfileNotFound,
                    "Teacher not found",
                ))),
                Err(e) => {
                    error!("Failed to get profile by id: {}", e);
                    Err(crate::services::internal_error(
                        "Internal server error while fetching teacher",
                    ))
                }
            }
        }
        ProfileRole::Student => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have permission to create a class",
        ))),
    }
}

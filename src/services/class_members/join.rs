use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ClassMemberService;
use crate::{
    errors::TutorError,
    middlewares::RequireJWT,
    models::{
        ApiResponse, ErrorCode, classes::requests::JoinClassRequest,
        profiles::entities::ProfileRole,
    },
    utils::validate::validate_invite_code,
};

pub async fn join_class(
    service: &ClassMemberService,
    request: &HttpRequest,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    if profile.role != ProfileRole::Student {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only students can join a class",
        )));
    }

    let invite_code = join_data.invite_code.trim();
    if validate_invite_code(invite_code).is_err() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassInviteCodeInvalid,
            "Invite code is invalid",
        )));
    }

    let storage = service.get_storage(request)?;
    let class = match storage.get_class_by_code(invite_code).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassInviteCodeInvalid,
                "Class not found or invite code is invalid",
            )));
        }
        Err(e) => {
            error!("Error getting class by invite code: {}", e);
            return Ok(crate::services::internal_error("Failed to look up class"));
        }
    };

    match storage.join_class(class.id, profile.id).await {
        Ok(member) => {
            info!("Student {} joined class {}", profile.id, class.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                member,
                "Class joined successfully",
            )))
        }
        Err(TutorError::Conflict(_)) => {
            let mut class = class;
            class.invite_code.clear();
            Ok(HttpResponse::Conflict().json(ApiResponse::error(
                ErrorCode::ClassAlreadyJoined,
                class,
                "You have already joined this class",
            )))
        }
        Err(e) => {
            error!("Error joining class: {}", e);
            Ok(crate::services::internal_error("Failed to join class"))
        }
    }
}

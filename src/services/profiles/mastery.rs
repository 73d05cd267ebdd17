use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use super::ProfileService;
use crate::feedback::summarize_mastery;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 当前学生在所有已发布反馈的作业上的掌握情况
pub async fn get_mastery(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    let storage = service.get_storage(request)?;
    let records = match storage
        .list_released_answer_records_for_student(profile.id)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load answer records of {}: {}", profile.id, e);
            return Ok(crate::services::internal_error("Failed to load marks"));
        }
    };

    match summarize_mastery(&records) {
        Ok(mastery) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            mastery,
            "Mastery retrieved successfully",
        ))),
        Err(e) if e.is_no_data() => {
            debug!("No released marks for profile {}", profile.id);
            Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FeedbackNoData,
                "No released feedback yet",
            )))
        }
        Err(e) => {
            error!("Failed to summarize mastery: {}", e);
            Ok(crate::services::internal_error("Failed to summarize mastery"))
        }
    }
}

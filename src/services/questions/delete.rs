use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::{QuestionService, can_modify};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    let storage = service.get_storage(request)?;
    match storage.get_question_by_id(question_id).await {
        Ok(Some(question)) if !can_modify(&profile, &question) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only delete your own questions",
            )));
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::QuestionNotFound,
                "Question not found",
            )));
        }
        Err(e) => {
            return Ok(crate::services::internal_error(format!(
                "Failed to load question: {e}"
            )));
        }
    }

    // 已有评分记录保留题目快照，不受删除影响
    match storage.delete_question(question_id).await {
        Ok(true) => {
            warn!("Question {} deleted by profile {}", question_id, profile.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Question deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Question deletion failed: {e}"
        ))),
    }
}

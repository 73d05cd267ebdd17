use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuestionService, can_modify};
use crate::middlewares::RequireJWT;
use crate::models::questions::requests::UpdateQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_question_marks, validate_sub_topic, validate_topic};

pub async fn update_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
    update: UpdateQuestionRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    if let Err(msg) = validate_update(&update) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;
    let existing = match storage.get_question_by_id(question_id).await {
        Ok(Some(q)) => q,
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
    };

    if !can_modify(&profile, &existing) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only edit your own questions",
        )));
    }

    match storage.update_question(question_id, update).await {
        Ok(Some(question)) => {
            info!("Question {} updated by profile {}", question.id, profile.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                question,
                "Question updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
        Err(e) => Ok(crate::services::internal_error(format!(
            "Question update failed: {e}"
        ))),
    }
}

fn validate_update(update: &UpdateQuestionRequest) -> Result<(), &'static str> {
    if let Some(latex) = &update.question_latex
        && latex.trim().is_empty()
    {
        return Err("Question text must not be empty");
    }
    if let Some(topic) = &update.topic {
        validate_topic(topic)?;
    }
    validate_sub_topic(update.sub_topic.as_deref())?;
    if let Some(marks) = update.marks {
        validate_question_marks(marks)?;
    }
    Ok(())
}

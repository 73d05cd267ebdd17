use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::QuestionService;
use crate::middlewares::RequireJWT;
use crate::models::questions::requests::CreateQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_question_marks, validate_sub_topic, validate_topic};

pub async fn create_question(
    service: &QuestionService,
    request: &HttpRequest,
    mut question: CreateQuestionRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(crate::services::missing_profile());
    };

    if let Err(msg) = validate_create(&question) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::QuestionInvalid,
            msg,
        )));
    }
    question.created_by = Some(profile.id);

    let storage = service.get_storage(request)?;
    match storage.create_question(question).await {
        Ok(question) => {
            info!(
                "Question {} ({}) created by profile {}",
                question.id, question.topic, profile.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                question,
                "Question created successfully",
            )))
        }
        Err(e) => {
            error!("Question creation failed: {}", e);
            Ok(crate::services::internal_error("Question creation failed"))
        }
    }
}

fn validate_create(question: &CreateQuestionRequest) -> Result<(), &'static str> {
    if question.question_latex.trim().is_empty() {
        return Err("Question text must not be empty");
    }
    validate_topic(&question.topic)?;
    validate_sub_topic(question.sub_topic.as_deref())?;
    validate_question_marks(question.marks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::{Difficulty, QuestionContentType};

    fn request(topic: &str, marks: f64) -> CreateQuestionRequest {
        CreateQuestionRequest {
            content_type: QuestionContentType::Manual,
            question_latex: "Expand $(x+1)^2$".into(),
            image_url: None,
            topic: topic.into(),
            sub_topic: Some("Expanding brackets".into()),
            difficulty: Difficulty::Foundation,
            marks,
            answer_key: None,
            is_verified: false,
            created_by: None,
        }
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&request("Algebra", 3.0)).is_ok());
        assert!(validate_create(&request("  ", 3.0)).is_err());
        assert!(validate_create(&request("Algebra", 0.0)).is_err());
        assert!(validate_create(&request("Algebra", 101.0)).is_err());

        let mut blank = request("Algebra", 3.0);
        blank.question_latex = " ".into();
        assert!(validate_create(&blank).is_err());
    }
}

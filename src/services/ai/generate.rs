use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AiService, llm_error_response, not_configured};
use crate::ai::prompts::{
    GENERATE_TEMPERATURE, MAX_TOKENS, build_generate_prompt, generate_system_prompt,
    parse_generated,
};
use crate::ai::{ChatMessage, ChatRequest};
use crate::models::ai::requests::GenerateQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_question_marks, validate_sub_topic, validate_topic};

pub async fn generate_question(
    service: &AiService,
    request: &HttpRequest,
    body: GenerateQuestionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_generate(&body) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let client = service.get_client(request)?;
    if !client.is_available() {
        return Ok(not_configured());
    }

    let chat = ChatRequest {
        model: client.text_model().to_string(),
        messages: vec![
            ChatMessage::system(generate_system_prompt()),
            ChatMessage::user(build_generate_prompt(&body)),
        ],
        temperature: GENERATE_TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    let completion = match client.complete(&chat).await {
        Ok(completion) => completion,
        Err(e) => {
            warn!("Question generation failed: {}", e);
            return Ok(llm_error_response(&e));
        }
    };

    match parse_generated(&completion.content, &body, &completion.model) {
        Ok(draft) => {
            info!(
                "Generated {} question on {} with {}",
                body.question_type, draft.topic, draft.model
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                draft,
                "Question generated successfully",
            )))
        }
        Err(e) => {
            warn!("Unusable generation reply: {}", e);
            Ok(llm_error_response(&e))
        }
    }
}

fn validate_generate(body: &GenerateQuestionRequest) -> Result<(), &'static str> {
    if body.level.trim().is_empty() {
        return Err("Level must not be empty");
    }
    validate_topic(&body.topic)?;
    validate_sub_topic(body.sub_topic.as_deref())?;
    validate_question_marks(f64::from(body.marks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_generate() {
        let mut body: GenerateQuestionRequest =
            serde_json::from_str(r#"{"level":"GCSE Higher","topic":"Algebra","marks":4}"#)
                .unwrap();
        assert!(validate_generate(&body).is_ok());

        body.marks = 0;
        assert!(validate_generate(&body).is_err());

        body.marks = 4;
        body.level = " ".into();
        assert!(validate_generate(&body).is_err());
    }
}

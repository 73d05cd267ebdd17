use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AiService, llm_error_response, not_configured};
use crate::ai::prompts::{MAX_TOKENS, OCR_TEMPERATURE, OCR_USER_PROMPT, ocr_system_prompt, parse_ocr};
use crate::ai::{ChatMessage, ChatRequest};
use crate::models::ai::requests::OcrRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn ocr_question(
    service: &AiService,
    request: &HttpRequest,
    body: OcrRequest,
) -> ActixResult<HttpResponse> {
    let image_url = body.image_url.trim();
    if !is_supported_image_url(image_url) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "image_url must be an http(s) URL or an image data URL",
        )));
    }

    let client = service.get_client(request)?;
    if !client.is_available() {
        return Ok(not_configured());
    }

    let chat = ChatRequest {
        model: client.vision_model().to_string(),
        messages: vec![
            ChatMessage::system(ocr_system_prompt()),
            ChatMessage::user_with_image(OCR_USER_PROMPT, image_url),
        ],
        temperature: OCR_TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    let completion = match client.complete(&chat).await {
        Ok(completion) => completion,
        Err(e) => {
            warn!("Question OCR failed: {}", e);
            return Ok(llm_error_response(&e));
        }
    };

    match parse_ocr(&completion.content, &completion.model) {
        Ok(result) => {
            info!(
                "Digitised question ({}, {}) with {}",
                result.suggested_topic, result.suggested_difficulty, result.model
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                result,
                "Question digitised successfully",
            )))
        }
        Err(e) => {
            warn!("Unusable OCR reply: {}", e);
            Ok(llm_error_response(&e))
        }
    }
}

fn is_supported_image_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://") || url.starts_with("data:image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_image_urls() {
        assert!(is_supported_image_url("https://cdn.example.com/q1.png"));
        assert!(is_supported_image_url("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_supported_image_url("file:///etc/passwd"));
        assert!(!is_supported_image_url(""));
    }
}

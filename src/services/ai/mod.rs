pub mod generate;
pub mod ocr;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::ai::LlmClient;
use crate::errors::TutorError;
use crate::models::ai::requests::{GenerateQuestionRequest, OcrRequest};
use crate::models::{ApiResponse, ErrorCode};

pub struct AiService {
    client: Option<Arc<LlmClient>>,
}

impl AiService {
    pub fn new_lazy() -> Self {
        Self { client: None }
    }

    pub(crate) fn get_client(&self, request: &HttpRequest) -> ActixResult<Arc<LlmClient>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        request
            .app_data::<web::Data<Arc<LlmClient>>>()
            .map(|c| c.get_ref().clone())
            .ok_or_else(|| actix_web::error::ErrorInternalServerError("LLM client not configured"))
    }

    // 生成题目草稿
    pub async fn generate_question(
        &self,
        request: &HttpRequest,
        body: GenerateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_question(self, request, body).await
    }

    // 识别题目图片
    pub async fn ocr_question(
        &self,
        request: &HttpRequest,
        body: OcrRequest,
    ) -> ActixResult<HttpResponse> {
        ocr::ocr_question(self, request, body).await
    }
}

pub(crate) fn not_configured() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
        ErrorCode::AiNotConfigured,
        "AI features are not configured",
    ))
}

/// 模型调用失败时的响应
pub(crate) fn llm_error_response(err: &TutorError) -> HttpResponse {
    match err {
        TutorError::LlmConfig(_) => not_configured(),
        TutorError::LlmResponse(msg) => HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::AiResponseInvalid,
            format!("The model reply could not be used: {msg}"),
        )),
        _ => HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::AiRequestFailed,
            "The AI provider request failed",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_llm_error_status() {
        assert_eq!(
            llm_error_response(&TutorError::llm_config("no key")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            llm_error_response(&TutorError::llm_response("bad json")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            llm_error_response(&TutorError::llm_request("HTTP 500")).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}

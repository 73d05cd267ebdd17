use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ai::requests::{GenerateQuestionRequest, OcrRequest};
use crate::models::profiles::entities::ProfileRole;
use crate::services::AiService;

// 懒加载的全局 AI_SERVICE 实例
static AI_SERVICE: Lazy<AiService> = Lazy::new(AiService::new_lazy);

pub async fn generate_question(
    req: HttpRequest,
    body: web::Json<GenerateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    AI_SERVICE.generate_question(&req, body.into_inner()).await
}

pub async fn ocr_question(
    req: HttpRequest,
    body: web::Json<OcrRequest>,
) -> ActixResult<HttpResponse> {
    AI_SERVICE.ocr_question(&req, body.into_inner()).await
}

// 配置路由：教师可用，按用户限流
pub fn configure_ai_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/ai")
            .wrap(middlewares::RateLimit::ai_generation())
            .wrap(middlewares::RequireRole::new_any(ProfileRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/generate", web::post().to(generate_question))
            .route("/ocr", web::post().to(ocr_question)),
    );
}

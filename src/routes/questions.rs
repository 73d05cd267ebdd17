use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::profiles::entities::ProfileRole;
use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest,
};
use crate::services::QuestionService;
use crate::utils::SafeQuestionIdI64;

// 懒加载的全局 QUESTION_SERVICE 实例
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn list_questions(
    req: HttpRequest,
    query: web::Query<QuestionListQuery>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .list_questions(&req, query.into_inner())
        .await
}

pub async fn create_question(
    req: HttpRequest,
    question: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .create_question(&req, question.into_inner())
        .await
}

pub async fn get_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_question(&req, question_id.0).await
}

pub async fn update_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
    update: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .update_question(&req, question_id.0, update.into_inner())
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    question_id: SafeQuestionIdI64,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.delete_question(&req, question_id.0).await
}

// 配置路由，题库只对教师和管理员开放
pub fn configure_questions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/questions")
            .wrap(middlewares::RequireRole::new_any(ProfileRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_questions))
                    .route(web::post().to(create_question)),
            )
            .service(
                web::resource("/{question_id}")
                    .route(web::get().to(get_question))
                    .route(web::put().to(update_question))
                    .route(web::delete().to(delete_question)),
            ),
    );
}

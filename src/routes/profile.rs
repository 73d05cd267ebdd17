use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::profiles::requests::UpdateProfileRequest;
use crate::services::ProfileService;

// 懒加载的全局 PROFILE_SERVICE 实例
static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_profile(&req).await
}

pub async fn get_mastery(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_mastery(&req).await
}

pub async fn update_profile(
    req: HttpRequest,
    update: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE
        .update_profile(&req, update.into_inner())
        .await
}

// 配置路由
pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/profile")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(get_profile))
                    .route(web::put().to(update_profile)),
            )
            .service(web::resource("/mastery").route(web::get().to(get_mastery))),
    );
}

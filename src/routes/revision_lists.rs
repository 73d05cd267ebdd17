use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::revision_lists::requests::UpdateRevisionProgressRequest;
use crate::services::RevisionListService;
use crate::utils::SafeRevisionListIdI64;

// 懒加载的全局 REVISION_LIST_SERVICE 实例
static REVISION_LIST_SERVICE: Lazy<RevisionListService> =
    Lazy::new(RevisionListService::new_lazy);

pub async fn list_revision_lists(req: HttpRequest) -> ActixResult<HttpResponse> {
    REVISION_LIST_SERVICE.student_revision_lists(&req).await
}

pub async fn get_revision_list(
    req: HttpRequest,
    revision_list_id: SafeRevisionListIdI64,
) -> ActixResult<HttpResponse> {
    REVISION_LIST_SERVICE
        .revision_list_detail(&req, revision_list_id.0)
        .await
}

pub async fn update_progress(
    req: HttpRequest,
    revision_list_id: SafeRevisionListIdI64,
    body: web::Json<UpdateRevisionProgressRequest>,
) -> ActixResult<HttpResponse> {
    REVISION_LIST_SERVICE
        .update_progress(&req, revision_list_id.0, body.into_inner())
        .await
}

// 配置路由
//
// 学生只能访问分配给自己的清单，教师端入口在作业路由下。
pub fn configure_revision_lists_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/revision-lists")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_revision_lists)))
            .service(
                web::resource("/{revision_list_id}").route(web::get().to(get_revision_list)),
            )
            .service(
                web::resource("/{revision_list_id}/progress")
                    .route(web::put().to(update_progress)),
            ),
    );
}

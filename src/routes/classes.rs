use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::classes::entities::ClassRole;
use crate::models::classes::requests::{
    ClassQueryParams, CreateClassRequest, JoinClassRequest, UpdateClassRequest,
};
use crate::models::profiles::entities::ProfileRole;
use crate::services::{ClassMemberService, ClassService};
use crate::utils::SafeStudentIdI64;

// 懒加载的全局服务实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static CLASS_MEMBER_SERVICE: Lazy<ClassMemberService> = Lazy::new(ClassMemberService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn join_class(
    req: HttpRequest,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE
        .join_class(&req, join_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req).await
}

pub async fn update_class(
    req: HttpRequest,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req).await
}

pub async fn list_members(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE
        .list_members(&req, query.into_inner())
        .await
}

pub async fn remove_member(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_MEMBER_SERVICE.remove_member(&req, student_id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 管理员查全部，教师查自己的，学生查已加入的
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        // 教师创建自己的班级，管理员可以为指定教师创建
                        .wrap(middlewares::RequireRole::new_any(ProfileRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/join").route(
                    web::post()
                        .to(join_class)
                        // 学生凭邀请码加入
                        .wrap(middlewares::RateLimit::invite_code())
                        .wrap(middlewares::RequireRole::new(&ProfileRole::Student)),
                ),
            )
            .service(
                web::resource("/{class_id}")
                    .route(
                        web::get()
                            .to(get_class)
                            .wrap(middlewares::RequireClassRole::new_any(ClassRole::all_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireClassRole::new_any(
                                ClassRole::owner_roles(),
                            )),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireClassRole::new_any(
                                ClassRole::owner_roles(),
                            )),
                    ),
            )
            .service(
                web::resource("/{class_id}/members").route(
                    web::get()
                        .to(list_members)
                        .wrap(middlewares::RequireClassRole::new_any(ClassRole::owner_roles())),
                ),
            )
            .service(
                web::resource("/{class_id}/members/{student_id}").route(
                    web::delete()
                        .to(remove_member)
                        .wrap(middlewares::RequireClassRole::new_any(ClassRole::owner_roles())),
                ),
            ),
    );
}

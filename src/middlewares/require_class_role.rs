/*!
 * 班级角色校验中间件
 *
 * 从路径参数 `class_id` 取班级，判断当前用户在班级中的身份：
 * 班级所属教师为 `Owner`，已加入的学生为 `Student`，管理员视同 `Owner`。
 *
 * 通过后把 [`ClassContext`] 放入请求扩展，处理函数可直接取用班级信息。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    errors::Result,
    models::{
        ErrorCode,
        classes::entities::{Class, ClassRole},
        profiles::entities::{Profile, ProfileRole},
    },
    storage::Storage,
};

use super::create_error_response;

/// 当前请求所在班级及用户身份
#[derive(Debug, Clone)]
pub struct ClassContext {
    pub class: Class,
    pub role: ClassRole,
}

/// 计算用户在班级中的身份，不属于该班级时返回 None
pub async fn resolve_class_role(
    storage: &Arc<dyn Storage>,
    profile: &Profile,
    class: &Class,
) -> Result<Option<ClassRole>> {
    if profile.role == ProfileRole::Admin || class.teacher_id == profile.id {
        return Ok(Some(ClassRole::Owner));
    }
    if profile.role == ProfileRole::Student
        && storage
            .get_class_member(class.id, profile.id)
            .await?
            .is_some()
    {
        return Ok(Some(ClassRole::Student));
    }
    Ok(None)
}

#[derive(Clone)]
pub struct RequireClassRole {
    required_roles: Vec<ClassRole>,
}

impl RequireClassRole {
    /// 创建需要特定班级角色的中间件
    pub fn new(role: &ClassRole) -> Self {
        Self {
            required_roles: vec![*role],
        }
    }

    /// 创建需要任一班级角色的中间件
    pub fn new_any(roles: &[&ClassRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassRoleMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireClassRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<ClassRole>,
}

impl<S, B> Service<ServiceRequest> for RequireClassRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            // 1. 校验用户信息
            let profile = req.extensions().get::<Profile>().cloned();
            let Some(profile) = profile else {
                return Ok(reject(
                    req,
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Unauthorized: missing profile",
                ));
            };

            // 2. 校验 class_id
            let Some(class_id) = req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0)
            else {
                return Ok(reject(
                    req,
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadRequest,
                    "Missing or invalid class_id",
                ));
            };

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone())
            else {
                return Ok(reject(
                    req,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Storage not configured",
                ));
            };

            // 3. 查询班级
            let class = match storage.get_class_by_id(class_id).await {
                Ok(Some(class)) => class,
                Ok(None) => {
                    return Ok(reject(
                        req,
                        StatusCode::NOT_FOUND,
                        ErrorCode::ClassNotFound,
                        "Class not found",
                    ));
                }
                Err(e) => {
                    error!("Failed to load class {}: {}", class_id, e);
                    return Ok(reject(
                        req,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Failed to load class",
                    ));
                }
            };

            // 4. 判断班级身份
            let role = match resolve_class_role(&storage, &profile, &class).await {
                Ok(Some(role)) => role,
                Ok(None) => {
                    return Ok(reject(
                        req,
                        StatusCode::FORBIDDEN,
                        ErrorCode::ClassPermissionDenied,
                        "No permission for this class",
                    ));
                }
                Err(e) => {
                    error!("Failed to resolve class role: {}", e);
                    return Ok(reject(
                        req,
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Failed to check class membership",
                    ));
                }
            };

            if !required_roles.contains(&role) {
                return Ok(reject(
                    req,
                    StatusCode::FORBIDDEN,
                    ErrorCode::ClassPermissionDenied,
                    "Access denied for this class role",
                ));
            }

            debug!("Profile {} acts as {} in class {}", profile.id, role, class.id);
            req.extensions_mut().insert(ClassContext { class, role });
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

fn reject<B>(
    req: ServiceRequest,
    status: StatusCode,
    code: ErrorCode,
    msg: &str,
) -> ServiceResponse<EitherBody<B>> {
    req.into_response(create_error_response(status, code, msg).map_into_right_body())
}

impl RequireClassRole {
    /// 从请求扩展中提取班级上下文
    pub fn extract_class_context(req: &actix_web::HttpRequest) -> Option<ClassContext> {
        req.extensions().get::<ClassContext>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::requests::CreateProfileRequest;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    #[tokio::test]
    async fn test_resolve_class_role() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let mut make = Vec::new();
        for (uid, role) in [
            ("owner", ProfileRole::Teacher),
            ("other", ProfileRole::Teacher),
            ("pupil", ProfileRole::Student),
            ("outsider", ProfileRole::Student),
        ] {
            make.push(
                storage
                    .create_profile(CreateProfileRequest {
                        auth_uid: uid.to_string(),
                        email: format!("{uid}@example.com"),
                        full_name: None,
                        role,
                    })
                    .await
                    .unwrap(),
            );
        }
        let (owner, other, pupil, outsider) = (&make[0], &make[1], &make[2], &make[3]);

        let class = storage
            .create_class(CreateClassRequest {
                teacher_id: Some(owner.id),
                name: "11X".to_string(),
                description: None,
            })
            .await
            .unwrap();
        storage.join_class(class.id, pupil.id).await.unwrap();

        let role = |p: &Profile| {
            let storage = storage.clone();
            let class = class.clone();
            let p = p.clone();
            async move { resolve_class_role(&storage, &p, &class).await.unwrap() }
        };

        assert_eq!(role(owner).await, Some(ClassRole::Owner));
        assert_eq!(role(other).await, None);
        assert_eq!(role(pupil).await, Some(ClassRole::Student));
        assert_eq!(role(outsider).await, None);

        let mut admin = other.clone();
        admin.role = ProfileRole::Admin;
        assert_eq!(role(&admin).await, Some(ClassRole::Owner));
    }
}

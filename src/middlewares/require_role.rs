/*!
 * 全局角色校验中间件
 *
 * 必须在 `RequireJWT` 之后生效（actix 中 `.wrap` 越靠后越先执行，所以写在它前面）。
 *
 * ```rust,ignore
 * web::resource("")
 *     .route(web::post().to(create_question))
 *     .wrap(RequireRole::new_any(ProfileRole::teacher_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    profiles::entities::{Profile, ProfileRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<ProfileRole>,
    require_all: bool, // true表示需要所有角色，false表示任一角色即可
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &ProfileRole) -> Self {
        Self {
            required_roles: vec![*role],
            require_all: true,
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&ProfileRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
            require_all: false,
        }
    }
}

fn role_permitted(required: &[ProfileRole], require_all: bool, role: ProfileRole) -> bool {
    if require_all {
        required.iter().all(|r| *r == role)
    } else {
        required.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
            require_all: self.require_all,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<ProfileRole>,
    require_all: bool,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();
        let require_all = self.require_all;

        Box::pin(async move {
            let profile = req.extensions().get::<Profile>().map(|p| (p.id, p.role));

            match profile {
                Some((profile_id, role)) => {
                    if role_permitted(&required_roles, require_all, role) {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for profile {} (role: {}). Required roles: {:?}",
                            profile_id, role, required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Access denied.",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check failed: no profile in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permits(guard: &RequireRole, role: ProfileRole) -> bool {
        role_permitted(&guard.required_roles, guard.require_all, role)
    }

    #[test]
    fn test_teacher_roles_permit_admin_but_not_student() {
        let guard = RequireRole::new_any(ProfileRole::teacher_roles());
        assert!(permits(&guard, ProfileRole::Teacher));
        assert!(permits(&guard, ProfileRole::Admin));
        assert!(!permits(&guard, ProfileRole::Student));
    }

    #[test]
    fn test_single_role() {
        let guard = RequireRole::new(&ProfileRole::Admin);
        assert!(permits(&guard, ProfileRole::Admin));
        assert!(!permits(&guard, ProfileRole::Teacher));
    }
}

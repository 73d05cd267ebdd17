/*!
 * JWT 认证中间件
 *
 * 校验托管认证服务签发的访问令牌，并把对应的用户资料放入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/classes")
 *         .wrap(RequireJWT)
 *         .route("", web::get().to(list_classes)),
 * );
 *
 * async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let profile = RequireJWT::extract_profile(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 用共享密钥校验签名、过期时间和受众
 * 3. 按 `sub` 查缓存，未命中再查数据库
 * 4. 数据库中也没有时，按令牌声明创建资料（首次访问）
 * 5. 令牌无效或缺失时返回 401
 */

use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::profiles::{
    entities::{Profile, ProfileRole},
    requests::CreateProfileRequest,
};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};
use crate::utils::validate::validate_email;
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
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 资料缓存键
pub fn profile_cache_key(auth_uid: &str) -> String {
    format!("profile:{auth_uid}")
}

#[derive(Clone)]
pub struct RequireJWT;

/// 从请求头中取出 Bearer 令牌
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 首次访问时由令牌声明构造资料
fn profile_request_from_claims(claims: &Claims) -> Result<CreateProfileRequest, String> {
    let email = claims
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| validate_email(e).is_ok())
        .ok_or_else(|| "Token has no valid email claim".to_string())?;

    Ok(CreateProfileRequest {
        auth_uid: claims.sub.clone(),
        email: email.to_string(),
        full_name: claims.user_metadata.full_name.clone(),
        role: ProfileRole::from_claim(claims.user_metadata.role.as_deref()),
    })
}

// 辅助函数：校验令牌并解析出资料
async fn authenticate(req: &ServiceRequest) -> Result<Profile, (StatusCode, String)> {
    let unauthorized = |msg: &str| (StatusCode::UNAUTHORIZED, msg.to_string());
    let internal = |msg: &str| (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string());

    let token =
        bearer_token(req).ok_or_else(|| unauthorized("Missing or invalid Authorization header"))?;

    let claims = JwtUtils::verify_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        unauthorized("Invalid JWT token")
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone())
        .ok_or_else(|| internal("Cache not configured"))?;

    let cache_key = profile_cache_key(&claims.sub);
    match cache.get::<Profile>(&cache_key).await {
        CacheResult::Found(profile) => return Ok(profile),
        CacheResult::ExistsButNoValue => cache.remove(&cache_key).await,
        CacheResult::NotFound => debug!("Profile not cached for {}", claims.sub),
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| internal("Storage not configured"))?;

    let profile = match storage.get_profile_by_auth_uid(&claims.sub).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            let create = profile_request_from_claims(&claims).map_err(|e| unauthorized(&e))?;
            let profile = storage.create_profile(create).await.map_err(|e| {
                error!("Failed to provision profile for {}: {}", claims.sub, e);
                internal("Failed to create profile")
            })?;
            info!(
                "Provisioned profile {} ({}) for {}",
                profile.id, profile.role, profile.auth_uid
            );
            profile
        }
        Err(e) => {
            error!("Failed to load profile for {}: {}", claims.sub, e);
            return Err(internal("Failed to load profile"));
        }
    };

    cache
        .insert(cache_key, &profile, AppConfig::get().cache.default_ttl)
        .await;

    Ok(profile)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(profile) => {
                    debug!("JWT authentication successful for profile: {}", profile.id);
                    req.extensions_mut().insert(profile);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err((status, err)) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    let code = if status == StatusCode::UNAUTHORIZED {
                        ErrorCode::Unauthorized
                    } else {
                        ErrorCode::InternalServerError
                    };
                    Ok(req.into_response(
                        create_error_response(status, code, &format!("Unauthorized: {err}"))
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户资料
    pub fn extract_profile(req: &actix_web::HttpRequest) -> Option<Profile> {
        req.extensions().get::<Profile>().cloned()
    }

    /// 从请求扩展中提取资料 ID
    pub fn extract_profile_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Profile>().map(|p| p.id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<ProfileRole> {
        req.extensions().get::<Profile>().map(|p| p.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::UserMetadata;

    fn claims(email: Option<&str>, role: Option<&str>) -> Claims {
        Claims {
            sub: "6f1c2a64-3e59-4b0e-9d55-2a7c1b8f0e11".to_string(),
            email: email.map(str::to_string),
            exp: 0,
            iat: 0,
            user_metadata: UserMetadata {
                full_name: Some("Sam Patel".to_string()),
                role: role.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_profile_from_claims() {
        let req = profile_request_from_claims(&claims(Some("sam@example.com"), Some("teacher")))
            .unwrap();
        assert_eq!(req.role, ProfileRole::Teacher);
        assert_eq!(req.email, "sam@example.com");
        assert_eq!(req.full_name.as_deref(), Some("Sam Patel"));

        let admin = profile_request_from_claims(&claims(Some("sam@example.com"), Some("admin")))
            .unwrap();
        assert_eq!(admin.role, ProfileRole::Student);
    }

    #[test]
    fn test_profile_from_claims_requires_email() {
        assert!(profile_request_from_claims(&claims(None, None)).is_err());
        assert!(profile_request_from_claims(&claims(Some("nope"), None)).is_err());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(profile_cache_key("abc"), "profile:abc");
    }
}

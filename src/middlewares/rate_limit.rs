/*!
 * 速率限制中间件
 *
 * 限制单个用户在固定时间窗口内的请求次数，主要保护 AI 出题接口和邀请码加入接口。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::{RateLimit, RequireJWT};
 *
 * App::new().service(
 *     web::scope("/api/v1/ai")
 *         .wrap(RateLimit::ai_generation())
 *         .wrap(RequireJWT)
 *         .route("/generate", web::post().to(generate_question)),
 * );
 * ```
 *
 * ## 限制规则
 *
 * - 已认证请求按资料 ID 计数，否则按客户端 IP
 * - 窗口从该键第一次请求开始计时，到期后重新计数
 * - 超过限制返回 429 Too Many Requests，并带 `Retry-After`
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, profiles::entities::Profile};

/// 全局计数缓存
/// 键: 前缀:用户标识，值: 当前窗口
static RATE_LIMIT_CACHE: Lazy<Cache<String, RateWindow>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

/// 一个计数窗口
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started: Instant,
    count: u32,
}

/// 计算本次请求后的窗口；超过限制时返回需要等待的秒数
fn advance_window(
    current: Option<RateWindow>,
    now: Instant,
    max_requests: u32,
    window: Duration,
) -> Result<RateWindow, u64> {
    match current {
        Some(w) if now.duration_since(w.started) < window => {
            if w.count >= max_requests {
                let left = window.saturating_sub(now.duration_since(w.started));
                Err(left.as_secs().max(1))
            } else {
                Ok(RateWindow {
                    started: w.started,
                    count: w.count + 1,
                })
            }
        }
        _ => Ok(RateWindow {
            started: now,
            count: 1,
        }),
    }
}

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// AI 出题与识图：10次/分钟/用户
    pub fn ai_generation() -> Self {
        Self::new(10, 60).with_prefix("ai")
    }

    /// 邀请码加入：10次/分钟/用户（防止枚举）
    pub fn invite_code() -> Self {
        Self::new(10, 60).with_prefix("invite_code")
    }
}

/// 从请求中提取客户端 IP
fn extract_client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .filter(|ip| ip.parse::<std::net::IpAddr>().is_ok())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window = Duration::from_secs(self.window_secs);
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let profile_id = req.extensions().get::<Profile>().map(|p| p.id);
            let identifier = profile_id
                .map(|id| format!("profile:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{key_prefix}:{identifier}")
            };

            let current = RATE_LIMIT_CACHE.get(&cache_key).await;
            match advance_window(current, Instant::now(), max_requests, window) {
                Ok(next) => {
                    RATE_LIMIT_CACHE.insert(cache_key, next).await;
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit exceeded for key: {} (limit {}/{}s)",
                        cache_key,
                        max_requests,
                        window.as_secs()
                    );
                    return Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ));
                }
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let ai = RateLimit::ai_generation();
        assert_eq!(ai.max_requests, 10);
        assert_eq!(ai.window_secs, 60);
        assert_eq!(ai.key_prefix, "ai");

        let invite = RateLimit::invite_code();
        assert_eq!(invite.key_prefix, "invite_code");
    }

    #[test]
    fn test_window_counts_and_blocks() {
        let start = Instant::now();
        let window = Duration::from_secs(60);

        let mut state = None;
        for expected in 1..=3 {
            let next = advance_window(state, start, 3, window).unwrap();
            assert_eq!(next.count, expected);
            state = Some(next);
        }

        let later = start + Duration::from_secs(20);
        let retry = advance_window(state, later, 3, window).unwrap_err();
        assert_eq!(retry, 40);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let start = Instant::now();
        let window = Duration::from_secs(60);
        let full = Some(RateWindow {
            started: start,
            count: 3,
        });

        let next = advance_window(full, start + window, 3, window).unwrap();
        assert_eq!(next.count, 1);
        assert_eq!(next.started, start + window);
    }
}

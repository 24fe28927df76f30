/*!
 * 速率限制中间件
 *
 * 按客户端 IP（已认证时按账号）计数，窗口内超过上限返回 429。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .route(web::post().to(login))
 *     .wrap(RateLimit::login())
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::AppConfig;
use crate::middlewares::create_error_response;
use crate::models::ErrorCode;
use crate::models::accounts::entities::Account;

/// 全局计数缓存
/// 键: 前缀:标识，值: (窗口开始时间, 请求计数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (Instant, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

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

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制，默认 5次/分钟/IP，可通过 auth 配置调整
    pub fn login() -> Self {
        let auth = &AppConfig::get().auth;
        Self::new(auth.login_max_attempts, auth.login_window_secs).with_prefix("login")
    }
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理后面时需要代理正确设置 X-Forwarded-For / X-Real-IP。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

fn extract_account_id(req: &ServiceRequest) -> Option<i64> {
    req.extensions().get::<Account>().map(|account| account.id)
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    let mut resp = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "Too many requests, please try again later",
    );
    let headers = resp.headers_mut();
    if let Ok(value) = retry_after.to_string().parse() {
        headers.insert(actix_web::http::header::RETRY_AFTER, value);
    }
    headers.insert(
        actix_web::http::header::HeaderName::from_static("x-ratelimit-remaining"),
        actix_web::http::header::HeaderValue::from_static("0"),
    );
    resp
}

/// 记录一次请求，返回 Err(剩余等待秒数) 表示超限
async fn hit(key: &str, max_requests: u32, window: Duration) -> Result<u32, u64> {
    let now = Instant::now();
    let (started, count) = match RATE_LIMIT_CACHE.get(key).await {
        Some((started, count)) if now.duration_since(started) < window => (started, count),
        _ => (now, 0),
    };

    if count >= max_requests {
        let wait = window.saturating_sub(now.duration_since(started));
        return Err(wait.as_secs().max(1));
    }

    RATE_LIMIT_CACHE
        .insert(key.to_string(), (started, count + 1))
        .await;
    Ok(max_requests - count - 1)
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
            let identifier = extract_account_id(&req)
                .map(|id| format!("account:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{key_prefix}:{identifier}")
            };

            match hit(&cache_key, max_requests, window).await {
                Ok(remaining) => {
                    req.extensions_mut().insert(RateLimitInfo {
                        remaining,
                        limit: max_requests,
                        reset: window.as_secs(),
                    });
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit exceeded for key: {} (limit: {})",
                        cache_key, max_requests
                    );
                    Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

/// 速率限制信息
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

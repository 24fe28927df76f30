/*!
 * 令牌认证中间件
 *
 * 解析 `Authorization: Token <key>`（兼容 `Bearer <key>`），把令牌对应的账号放进请求扩展。
 *
 * ## 解析规则
 *
 * 1. 没有 Authorization 头：匿名访问，交给各接口的授权策略决定是否放行
 * 2. 令牌格式错误、令牌不存在或账号已停用：直接返回 401
 * 3. 令牌有效：账号写入请求扩展，并以 `account:{token}` 缓存
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/classrooms")
 *     .wrap(middlewares::TokenAuth)
 *     .route("", web::get().to(list_classrooms))
 *
 * async fn handler(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let actor = TokenAuth::extract_account(&req); // Option<Account>
 *     ...
 * }
 * ```
 *
 * 账号被修改、停用或令牌被吊销时需要调用 [`TokenAuth::evict`] 清除缓存。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::middlewares::create_error_response;
use crate::models::ErrorCode;
use crate::models::accounts::entities::Account;
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::AUTHORIZATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

const TOKEN_PREFIX: &str = "Token ";
const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct TokenAuth;

/// 当前请求使用的令牌
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

enum AuthFailure {
    Unauthorized(String),
    Internal(String),
}

pub fn account_cache_key(token: &str) -> String {
    format!("account:{token}")
}

// 从请求头中取出令牌，None 表示匿名
fn extract_token(req: &ServiceRequest) -> Result<Option<String>, AuthFailure> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| AuthFailure::Unauthorized("Invalid Authorization header".into()))?;

    let token = value
        .strip_prefix(TOKEN_PREFIX)
        .or_else(|| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthFailure::Unauthorized("Invalid Authorization header".into()))?;

    Ok(Some(token.to_string()))
}

// 将令牌解析为账号：先查缓存，未命中再查存储
async fn resolve_account(req: &ServiceRequest, token: &str) -> Result<Account, AuthFailure> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());
    let cache_key = account_cache_key(token);

    if let Some(cache) = &cache
        && let CacheResult::Found(account) = cache.get::<Account>(&cache_key).await
        && account.is_active
    {
        return Ok(account);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|s| s.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("Storage not found in app data".into()))?;

    let account = storage
        .get_account_by_token(token)
        .await
        .map_err(|e| AuthFailure::Internal(format!("Failed to resolve token: {e}")))?
        .ok_or_else(|| AuthFailure::Unauthorized("Invalid token".into()))?;

    if !account.is_active {
        return Err(AuthFailure::Unauthorized("Account is inactive".into()));
    }

    if let Some(cache) = &cache {
        cache
            .insert(cache_key, &account, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(account)
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct TokenAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddleware<S>
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
            let resolved = match extract_token(&req) {
                Ok(Some(token)) => resolve_account(&req, &token)
                    .await
                    .map(|account| Some((account, token))),
                Ok(None) => Ok(None),
                Err(failure) => Err(failure),
            };

            match resolved {
                Ok(Some((account, token))) => {
                    debug!("Token authentication successful for ID: {}", account.id);
                    req.extensions_mut().insert(account);
                    req.extensions_mut().insert(AuthToken(token));
                }
                Ok(None) => {}
                Err(AuthFailure::Unauthorized(reason)) => {
                    info!(
                        "Token authentication failed for request to {}: {}",
                        req.path(),
                        reason
                    );
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::TokenInvalid,
                            &format!("Unauthorized: {reason}"),
                        )
                        .map_into_right_body(),
                    ));
                }
                Err(AuthFailure::Internal(reason)) => {
                    error!("Token authentication error: {}", reason);
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to authenticate request",
                        )
                        .map_into_right_body(),
                    ));
                }
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

impl TokenAuth {
    /// 当前请求的账号，匿名时为 None
    pub fn extract_account(req: &HttpRequest) -> Option<Account> {
        req.extensions().get::<Account>().cloned()
    }

    pub fn extract_account_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<Account>().map(|account| account.id)
    }

    /// 当前请求携带的令牌
    pub fn extract_token(req: &HttpRequest) -> Option<String> {
        req.extensions().get::<AuthToken>().map(|t| t.0.clone())
    }

    /// 清除令牌对应的账号缓存
    pub async fn evict(req: &HttpRequest, token: &str) {
        if let Some(cache) = req.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
            cache.remove(&account_cache_key(token)).await;
        }
    }
}

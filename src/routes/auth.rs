use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::LoginRequest;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/login")
            .wrap(middlewares::RateLimit::login())
            .route(web::post().to(login)),
    )
    .service(
        web::resource("/api/v1/logout")
            .wrap(middlewares::TokenAuth)
            .route(web::post().to(logout)),
    );
}

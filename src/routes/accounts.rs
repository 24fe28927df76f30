//! 教师与学生路由的公共部分

use actix_web::{HttpRequest, web};

use crate::middlewares;
use crate::models::accounts::requests::{
    AccountListParams, CreateAccountRequest, UpdateAccountRequest,
};
use crate::services::AccountService;
use crate::utils::SafeIDI64;

/// 在 `path` 下挂载一组账号接口，`service` 决定角色
pub(crate) fn configure_account_routes(
    cfg: &mut web::ServiceConfig,
    path: &str,
    service: &'static AccountService,
) {
    cfg.service(
        web::scope(path)
            .wrap(middlewares::TokenAuth)
            .service(
                web::resource("")
                    .route(web::get().to(
                        move |req: HttpRequest, query: web::Query<AccountListParams>| async move {
                            service.list_accounts(&req, query.into_inner()).await
                        },
                    ))
                    .route(web::post().to(
                        move |req: HttpRequest, data: web::Json<CreateAccountRequest>| async move {
                            service.create_account(&req, data.into_inner()).await
                        },
                    )),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(move |req: HttpRequest, id: SafeIDI64| async move {
                        service.get_account(&req, id.0).await
                    }))
                    .route(web::put().to(
                        move |req: HttpRequest,
                              id: SafeIDI64,
                              data: web::Json<UpdateAccountRequest>| async move {
                            service
                                .update_account(&req, id.0, data.into_inner(), false)
                                .await
                        },
                    ))
                    .route(web::patch().to(
                        move |req: HttpRequest,
                              id: SafeIDI64,
                              data: web::Json<UpdateAccountRequest>| async move {
                            service
                                .update_account(&req, id.0, data.into_inner(), true)
                                .await
                        },
                    ))
                    .route(web::delete().to(move |req: HttpRequest, id: SafeIDI64| async move {
                        service.delete_account(&req, id.0).await
                    })),
            )
            .service(
                web::resource("/{id}/profile-pic").route(web::get().to(
                    move |req: HttpRequest, id: SafeIDI64| async move {
                        service.get_profile_pic(&req, id.0).await
                    },
                )),
            ),
    );
}

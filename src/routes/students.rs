use actix_web::web;
use once_cell::sync::Lazy;

use crate::models::accounts::entities::AccountRole;
use crate::services::AccountService;

// 懒加载的全局学生账号服务
static STUDENT_SERVICE: Lazy<AccountService> =
    Lazy::new(|| AccountService::new_lazy(AccountRole::Student));

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    super::accounts::configure_account_routes(cfg, "/api/v1/students", &STUDENT_SERVICE);
}

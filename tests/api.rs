//! HTTP 流程测试：内存 SQLite + moka 缓存

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use online_school::cache::ObjectCache;
use online_school::cache::object_cache::moka::MokaCacheWrapper;
use online_school::routes;
use online_school::storage::Storage;
use online_school::storage::sea_orm_storage::SeaOrmStorage;
use online_school::utils::{json_error_handler, query_error_handler};

const PASSWORD: &str = "pass1234";

macro_rules! school_app {
    ($storage:expr) => {{
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(1_000, 60));
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(cache))
                .configure(routes::configure_auth_routes)
                .configure(routes::configure_teachers_routes)
                .configure(routes::configure_students_routes)
                .configure(routes::configure_classrooms_routes)
                .configure(routes::configure_submissions_routes)
                .configure(routes::configure_assignments_routes),
        )
        .await
    }};
}

async fn new_storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::in_memory().await.expect("in-memory storage"))
}

async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn auth(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Token {token}"))
}

/// 通过注册接口创建账号，返回 (id, token)
macro_rules! register {
    ($app:expr, $storage:expr, $path:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri($path)
            .set_json(json!({"username": $username, "password": PASSWORD}))
            .to_request();
        let (status, body) = send($app, req).await;
        assert_eq!(status, StatusCode::CREATED, "register {}: {body}", $username);
        let id = body["data"]["id"].as_i64().expect("account id");
        let token = $storage.get_or_create_token(id).await.expect("token");
        (id, token)
    }};
}

macro_rules! teacher {
    ($app:expr, $storage:expr, $username:expr) => {
        register!($app, $storage, "/api/v1/teachers", $username)
    };
}

macro_rules! student {
    ($app:expr, $storage:expr, $username:expr) => {
        register!($app, $storage, "/api/v1/students", $username)
    };
}

#[actix_web::test]
async fn test_role_comes_from_creation_path() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/teachers")
        .set_json(json!({"username": "t1", "password": PASSWORD, "role": "STUDENT"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "TEACHER");
    let teacher_id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(json!({"username": "s1", "password": PASSWORD, "role": "TEACHER"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "STUDENT");
    assert!(body["data"].get("password_hash").is_none());
    let student_id = body["data"]["id"].as_i64().expect("id");

    // 视图按角色划分
    let token = storage.get_or_create_token(teacher_id).await.expect("token");
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/teachers/{student_id}"))
        .insert_header(auth(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{student_id}"))
        .insert_header(auth(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "s1");
}

#[actix_web::test]
async fn test_duplicate_username_is_conflict() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (_, token) = teacher!(&app, &storage, "dup");

    // 用户名跨角色唯一
    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(json!({"username": "dup", "password": PASSWORD}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/v1/students")
        .insert_header(auth(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_validation_errors_are_field_level() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/teachers")
        .set_json(json!({"username": "bad name!"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["username"].is_array());
    assert!(body["data"]["password"].is_array());

    // 路径 ID 非法
    let req = test::TestRequest::get()
        .uri("/api/v1/classrooms/abc")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // JSON 格式错误
    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_account_reads_require_authentication() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let req = test::TestRequest::get().uri("/api/v1/teachers").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/assignments-completed")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 教室与作业允许匿名读
    let req = test::TestRequest::get().uri("/api/v1/classrooms").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/assignments").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    // 无效令牌
    let req = test::TestRequest::get()
        .uri("/api/v1/assignments")
        .insert_header(auth("0000000000000000000000000000000000000000"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_account_self_update_and_deactivate() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (s1, s1_token) = student!(&app, &storage, "s1");
    let (s2, _) = student!(&app, &storage, "s2");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/students/{s1}"))
        .insert_header(auth(&s1_token))
        .set_json(json!({"first_name": "Ada", "profile_pic": "../../me.png"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Ada");
    assert_eq!(body["data"]["profile_pic"], "uploads/profiles/STUDENT/s1/me.png");

    // 只能修改自己
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/students/{s2}"))
        .insert_header(auth(&s1_token))
        .set_json(json!({"first_name": "Mallory"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // PUT 需要完整字段
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{s1}"))
        .insert_header(auth(&s1_token))
        .set_json(json!({"username": "s1"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["password"].is_array());

    // 改成别人的用户名
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/students/{s1}"))
        .insert_header(auth(&s1_token))
        .set_json(json!({"username": "s2"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{s1}/profile-pic"))
        .insert_header(auth(&s1_token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], s1);
    assert_eq!(body["data"]["profile_pic"], "uploads/profiles/STUDENT/s1/me.png");

    let req = test::TestRequest::get()
        .uri("/api/v1/teachers/9999/profile-pic")
        .insert_header(auth(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 停用后令牌失效，账号仍保留
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/students/{s1}"))
        .insert_header(auth(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/students")
        .insert_header(auth(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let account = storage
        .get_account_by_id(s1)
        .await
        .expect("lookup")
        .expect("account kept");
    assert!(!account.is_active);
}

#[actix_web::test]
async fn test_assignment_owner_is_injected() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (t1, t1_token) = teacher!(&app, &storage, "t1");
    let (t2, _) = teacher!(&app, &storage, "t2");
    let (_, s1_token) = student!(&app, &storage, "s1");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({
            "title": "HW1",
            "attachment": "hw1.pdf",
            "owner_teacher": t2,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_teacher"], t1);
    assert_eq!(body["data"]["attachment"], "uploads/attachments/hw1.pdf");

    // 学生不能创建作业
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&s1_token))
        .set_json(json!({"title": "HW2", "attachment": "hw2.pdf"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 匿名创建为未认证
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .set_json(json!({"title": "HW3", "attachment": "hw3.pdf"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // completed_by 只能是学生
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW4", "attachment": "hw4.pdf", "completed_by": [t2]}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["completed_by"].is_array());

    // 缺少附件
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW5"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["attachment"].is_array());
}

#[actix_web::test]
async fn test_only_owner_teacher_modifies_assignment() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (_, t1_token) = teacher!(&app, &storage, "t1");
    let (_, t2_token) = teacher!(&app, &storage, "t2");
    let (s1, _) = student!(&app, &storage, "s1");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW1", "attachment": "hw1.pdf"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let assignment_id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/assignments/{assignment_id}"))
        .insert_header(auth(&t2_token))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/assignments/{assignment_id}"))
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW1 (v2)", "completed_by": [s1]}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "HW1 (v2)");
    assert_eq!(body["data"]["completed_by"], json!([s1]));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/assignments/{assignment_id}"))
        .insert_header(auth(&t2_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 匿名可读
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{assignment_id}"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "HW1 (v2)");
}

#[actix_web::test]
async fn test_submission_owner_injected_and_score_forced() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (_, t1_token) = teacher!(&app, &storage, "t1");
    let (s1, s1_token) = student!(&app, &storage, "s1");
    let (s2, _) = student!(&app, &storage, "s2");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW1", "attachment": "hw1.pdf"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let assignment_id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments-completed")
        .insert_header(auth(&s1_token))
        .set_json(json!({
            "assignment": assignment_id,
            "notes": "done",
            "score": 100,
            "accepted": true,
            "owner_student": s2,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_student"], s1);
    assert_eq!(body["data"]["score"], Value::Null);
    assert_eq!(body["data"]["accepted"], false);

    // 教师不能提交
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments-completed")
        .insert_header(auth(&t1_token))
        .set_json(json!({"assignment": assignment_id, "notes": "x"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 作业不存在
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments-completed")
        .insert_header(auth(&s1_token))
        .set_json(json!({"assignment": 9999, "notes": "x"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["assignment"].is_array());
}

#[actix_web::test]
async fn test_submission_object_access() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (_, t1_token) = teacher!(&app, &storage, "t1");
    let (_, t2_token) = teacher!(&app, &storage, "t2");
    let (_, s1_token) = student!(&app, &storage, "s1");
    let (_, s2_token) = student!(&app, &storage, "s2");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW1", "attachment": "hw1.pdf"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let assignment_id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments-completed")
        .insert_header(auth(&s1_token))
        .set_json(json!({"assignment": assignment_id, "notes": "done"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let submission_id = body["data"]["id"].as_i64().expect("id");
    let uri = format!("/api/v1/assignments-completed/{submission_id}");

    // 查看：提交者与评分教师
    for (token, expected) in [
        (&s1_token, StatusCode::OK),
        (&t1_token, StatusCode::OK),
        (&s2_token, StatusCode::FORBIDDEN),
        (&t2_token, StatusCode::FORBIDDEN),
    ] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(auth(token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, expected);
    }

    // 非提交者的学生 PATCH 被拒绝
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth(&s2_token))
        .set_json(json!({"notes": "mine now"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 评分教师不能 PUT 或 DELETE
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(auth(&t1_token))
        .set_json(json!({"assignment": assignment_id, "notes": "x"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(auth(&t1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 提交者修改内容，score 被忽略
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth(&s1_token))
        .set_json(json!({"notes": "done twice", "score": 100}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "done twice");
    assert_eq!(body["data"]["score"], Value::Null);

    // 列表按身份划分
    let list = |token: &str| {
        test::TestRequest::get()
            .uri("/api/v1/assignments-completed")
            .insert_header(auth(token))
            .to_request()
    };
    let (_, body) = send(&app, list(&s1_token)).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    let (_, body) = send(&app, list(&s2_token)).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);
    let (_, body) = send(&app, list(&t1_token)).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    let (_, body) = send(&app, list(&t2_token)).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(auth(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_classroom_delete_cascades() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (_, t1_token) = teacher!(&app, &storage, "t1");
    let (_, t2_token) = teacher!(&app, &storage, "t2");
    let (_, s1_token) = student!(&app, &storage, "s1");

    let req = test::TestRequest::post()
        .uri("/api/v1/classrooms")
        .insert_header(auth(&t1_token))
        .set_json(json!({"class_name": "Algebra"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let classroom_id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW1", "attachment": "hw1.pdf", "classroom": classroom_id}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let assignment_id = body["data"]["id"].as_i64().expect("id");
    assert_eq!(body["data"]["classroom"], classroom_id);

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments-completed")
        .insert_header(auth(&s1_token))
        .set_json(json!({"assignment": assignment_id, "notes": "done"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let submission_id = body["data"]["id"].as_i64().expect("id");

    // 其他教师不能删除
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/classrooms/{classroom_id}"))
        .insert_header(auth(&t2_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/classrooms/{classroom_id}"))
        .insert_header(auth(&t1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments/{assignment_id}"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/assignments-completed/{submission_id}"))
        .insert_header(auth(&s1_token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_login_logout_flow() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/teachers")
        .set_json(json!({"username": "t1", "password": PASSWORD}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let t1 = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .peer_addr("10.0.0.1:40000".parse().expect("addr"))
        .set_json(json!({"username": "t1", "password": "wrong"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("data").is_none());
    assert!(
        storage
            .get_token_by_account_id(t1)
            .await
            .expect("lookup")
            .is_none()
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .peer_addr("10.0.0.1:40000".parse().expect("addr"))
        .set_json(json!({"username": "t1", "password": PASSWORD}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().expect("token").to_string();
    assert_eq!(token.len(), 40);

    // 令牌解析为同一账号
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/teachers/{t1}"))
        .insert_header(auth(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "t1");
    assert!(body["data"]["last_login"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/v1/logout")
        .insert_header(auth(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/teachers/{t1}"))
        .insert_header(auth(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_login_is_rate_limited() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let attempt = || {
        test::TestRequest::post()
            .uri("/api/v1/login")
            .peer_addr("10.0.0.2:40000".parse().expect("addr"))
            .set_json(json!({"username": "nobody", "password": "x"}))
            .to_request()
    };

    for _ in 0..5 {
        let (status, _) = send(&app, attempt()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = send(&app, attempt()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_grading_scenario() {
    let storage = new_storage().await;
    let app = school_app!(storage);

    let (t1, t1_token) = teacher!(&app, &storage, "t1");
    let (_, t2_token) = teacher!(&app, &storage, "t2");
    let (s1, s1_token) = student!(&app, &storage, "s1");

    let req = test::TestRequest::post()
        .uri("/api/v1/classrooms")
        .insert_header(auth(&t1_token))
        .set_json(json!({"class_name": "Algebra"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["owner_teacher"], t1);
    let algebra = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(auth(&t1_token))
        .set_json(json!({"title": "HW1", "attachment": "hw1.pdf", "classroom": algebra}))
        .to_request();
    let (_, body) = send(&app, req).await;
    let hw1 = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/v1/assignments-completed")
        .insert_header(auth(&s1_token))
        .set_json(json!({"assignment": hw1, "notes": "done"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["owner_student"], s1);
    assert_eq!(body["data"]["score"], Value::Null);
    let uri = format!(
        "/api/v1/assignments-completed/{}",
        body["data"]["id"].as_i64().expect("id")
    );

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth(&t1_token))
        .set_json(json!({"score": 90, "notes": "ignored"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["score"], 90);
    assert_eq!(body["data"]["notes"], "done");

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth(&t2_token))
        .set_json(json!({"score": 10}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 分数不设上下限
    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth(&t1_token))
        .set_json(json!({"score": 150}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["score"], 150);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(auth(&s1_token))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["score"], 150);
}

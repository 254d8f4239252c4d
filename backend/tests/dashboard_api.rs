//! End-to-end flows through the `/api` scope over the in-memory backend.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use looma_backend::Trace;
use looma_backend::domain::{Role, SESSION_COOKIE_NAME, SchoolStatus};
use looma_backend::inbound::http::configure_api;
use looma_backend::test_support::{MemoryBackend, TEST_PASSWORD};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn backend() -> MemoryBackend {
    MemoryBackend::new()
}

macro_rules! init_app {
    ($backend:expr) => {
        test::init_service(
            App::new()
                .app_data($backend.data())
                .wrap(Trace)
                .service(web::scope("/api").configure(configure_api)),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn admin_registers_a_school_and_staff_record_a_visit(backend: MemoryBackend) {
    backend.seed_user("maya", Role::Admin).await;
    let staff = backend.login_as("sita", Role::Staff).await;
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "maya", "password": TEST_PASSWORD }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let admin: Cookie<'static> = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie");

    let req = test::TestRequest::post()
        .uri("/api/schools")
        .cookie(admin.clone())
        .set_json(json!({
            "name": "Shree Saraswati School",
            "province": "Bagmati",
            "district": "Sindhupalchok",
            "contact": { "headmaster": "Ram Bahadur" }
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let school = created.get("school").expect("school envelope");
    let school_id = school.get("id").and_then(Value::as_str).expect("id").to_owned();
    let looma_id = school.get("loomaId").and_then(Value::as_str).expect("loomaId").to_owned();
    assert_eq!(school.get("status"), Some(&json!("offline")));
    assert!(school.get("image").and_then(Value::as_str).is_some_and(|image| {
        image.starts_with("/schools/school-") && image.ends_with(".jpg")
    }));

    let req = test::TestRequest::patch()
        .uri(&format!("/api/schools/{school_id}/status"))
        .cookie(staff.clone())
        .set_json(json!({ "status": "online" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = test::TestRequest::post()
        .uri("/api/qr-scans")
        .cookie(staff.clone())
        .set_json(json!({ "schoolId": school_id, "loomaId": looma_id }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/schools?status=online")
        .cookie(staff)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.get("total"), Some(&json!(1)));
}

#[rstest]
#[actix_web::test]
async fn deleting_a_school_keeps_its_audit_trail(backend: MemoryBackend) {
    let school = backend
        .seed_school("Bal Kalyan Primary", "Lumbini", "Rupandehi", SchoolStatus::Online)
        .await;
    let admin = backend.login_as("maya", Role::Admin).await;
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/access-logs")
        .cookie(admin.clone())
        .set_json(json!({ "schoolId": school.id, "action": "remote_access" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/schools/{}", school.id))
        .cookie(admin.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/access-logs")
        .cookie(admin.clone())
        .to_request();
    let logs: Value = test::call_and_read_body_json(&app, req).await;
    let entries = logs.as_array().expect("access log array");
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries.first().and_then(|entry| entry.get("schoolId")),
        Some(&json!(school.id.to_string()))
    );

    let req = test::TestRequest::post()
        .uri("/api/access-logs")
        .cookie(admin.clone())
        .set_json(json!({ "schoolId": school.id, "action": "remote_access" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/schools/{}", school.id))
        .cookie(admin)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/api/schools")]
#[case("/api/users")]
#[case("/api/access-logs")]
#[case("/api/qr-scans")]
#[case("/api/auth/me")]
#[actix_web::test]
async fn every_endpoint_requires_a_session(backend: MemoryBackend, #[case] path: &str) {
    let app = init_app!(backend);
    let req = test::TestRequest::get().uri(path).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("code"), Some(&json!("unauthorized")));
}

#[rstest]
#[case(Role::Admin, StatusCode::OK)]
#[case(Role::Staff, StatusCode::FORBIDDEN)]
#[case(Role::Viewer, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn only_admins_manage_users(
    backend: MemoryBackend,
    #[case] role: Role,
    #[case] expected: StatusCode,
) {
    let cookie = backend.login_as("probe", role).await;
    let app = init_app!(backend);
    let req = test::TestRequest::get()
        .uri("/api/users")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), expected);
}

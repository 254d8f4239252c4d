//! Handler tests for the school roster endpoints.

use super::*;
use crate::domain::{Role, SchoolId};
use crate::inbound::http::test_utils::{TestHarness, api_app, harness};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

async fn seed_roster(harness: &TestHarness) -> Vec<School> {
    vec![
        harness
            .seed_school("Shree Janata Secondary", "Gandaki", "Kaski", SchoolStatus::Online)
            .await,
        harness
            .seed_school("Bal Kalyan Primary", "Lumbini", "Rupandehi", SchoolStatus::Offline)
            .await,
        harness
            .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Maintenance)
            .await,
    ]
}

fn names(body: &Value) -> Vec<String> {
    body.get("schools")
        .and_then(Value::as_array)
        .map(|schools| {
            schools
                .iter()
                .filter_map(|school| school.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

async fn get_json(harness: &TestHarness, cookie: Cookie<'static>, uri: &str) -> (StatusCode, Value) {
    let app = actix_test::init_service(api_app(harness)).await;
    let req = actix_test::TestRequest::get().uri(uri).cookie(cookie).to_request();
    let res = actix_test::call_service(&app, req).await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn list_requires_a_session(harness: TestHarness) {
    let app = actix_test::init_service(api_app(&harness)).await;
    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/api/schools").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn list_returns_schools_by_name_with_images(harness: TestHarness) {
    seed_roster(&harness).await;
    let cookie = harness.login_as("viewer", Role::Viewer).await;

    let (status, body) = get_json(&harness, cookie, "/api/schools").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("total"), Some(&json!(3)));
    assert_eq!(
        names(&body),
        ["Amar Jyoti School", "Bal Kalyan Primary", "Shree Janata Secondary"]
    );
    let image = body
        .pointer("/schools/0/image")
        .and_then(Value::as_str)
        .expect("image");
    assert!(image.starts_with("/schools/school-"));
    assert!(body.pointer("/schools/0/looma/serialNumber").is_some());
}

#[rstest]
#[case("/api/schools?status=online", vec!["Shree Janata Secondary"])]
#[case("/api/schools?status=all&province=Gandaki", vec!["Amar Jyoti School", "Shree Janata Secondary"])]
#[case("/api/schools?province=all&search=KALYAN", vec!["Bal Kalyan Primary"])]
#[case("/api/schools?search=tanahun", vec!["Amar Jyoti School"])]
#[case("/api/schools?search=nowhere", vec![])]
#[actix_web::test]
async fn list_applies_filters(
    harness: TestHarness,
    #[case] uri: &str,
    #[case] expected: Vec<&str>,
) {
    seed_roster(&harness).await;
    let cookie = harness.login_as("viewer", Role::Viewer).await;
    let (_, body) = get_json(&harness, cookie, uri).await;
    assert_eq!(names(&body), expected);
    assert_eq!(body.get("total"), Some(&json!(expected.len())));
}

#[rstest]
#[case("sort=district", vec!["Shree Janata Secondary", "Bal Kalyan Primary", "Amar Jyoti School"])]
#[case("sort=status&order=desc", vec!["Shree Janata Secondary", "Bal Kalyan Primary", "Amar Jyoti School"])]
#[case("sort=province", vec!["Amar Jyoti School", "Shree Janata Secondary", "Bal Kalyan Primary"])]
#[case("order=desc", vec!["Shree Janata Secondary", "Bal Kalyan Primary", "Amar Jyoti School"])]
#[actix_web::test]
async fn list_honours_sort_parameters(
    harness: TestHarness,
    #[case] query: &str,
    #[case] expected: Vec<&str>,
) {
    seed_roster(&harness).await;
    let cookie = harness.login_as("viewer", Role::Viewer).await;
    let (_, body) = get_json(&harness, cookie, &format!("/api/schools?{query}")).await;
    assert_eq!(names(&body), expected);
}

#[rstest]
#[case("status=broken", "status")]
#[case("sort=colour", "sort")]
#[case("order=sideways", "order")]
#[actix_web::test]
async fn list_rejects_unknown_values(
    harness: TestHarness,
    #[case] query: &str,
    #[case] field: &str,
) {
    let cookie = harness.login_as("viewer", Role::Viewer).await;
    let (status, body) = get_json(&harness, cookie, &format!("/api/schools?{query}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("code"), Some(&json!("invalid_request")));
    assert_eq!(body.pointer("/details/field"), Some(&json!(field)));
}

#[rstest]
#[actix_web::test]
async fn stats_counts_every_status(harness: TestHarness) {
    seed_roster(&harness).await;
    harness
        .seed_school("Gyan Jyoti", "Koshi", "Morang", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("viewer", Role::Viewer).await;

    let (status, body) = get_json(&harness, cookie, "/api/schools?stats=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total": 4,
            "online": 2,
            "offline": 1,
            "maintenance": 1,
            "devices": 4,
            "onlinePercentage": 50
        })
    );
}

#[rstest]
#[case("1")]
#[case("TRUE")]
#[case("yes")]
#[actix_web::test]
async fn only_the_literal_true_switches_to_stats(harness: TestHarness, #[case] flag: &str) {
    seed_roster(&harness).await;
    let cookie = harness.login_as("viewer", Role::Viewer).await;
    let (status, body) = get_json(&harness, cookie, &format!("/api/schools?stats={flag}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("total"), Some(&json!(3)));
    assert!(body.get("schools").is_some_and(Value::is_array));
}

#[rstest]
#[actix_web::test]
async fn create_fills_defaults_and_reads_nested_contact(harness: TestHarness) {
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/schools")
        .cookie(cookie)
        .set_json(json!({
            "name": "Shree Saraswati School",
            "province": "Bagmati",
            "district": "Lalitpur",
            "contact": { "headmaster": "Gita Thapa" },
            "phone": "+977-1-5550101"
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    let school = body.get("school").expect("school envelope");
    assert_eq!(school.get("status"), Some(&json!("offline")));
    assert_eq!(school.get("loomaCount"), Some(&json!(1)));
    assert_eq!(
        school.pointer("/contact/email"),
        Some(&json!("shreesaraswatischool@edu.gov.np"))
    );
    assert_eq!(school.pointer("/contact/headmaster"), Some(&json!("Gita Thapa")));
    assert_eq!(school.pointer("/contact/phone"), Some(&json!("+977-1-5550101")));
    assert_eq!(school.pointer("/looma/version"), Some(&json!("v3.0.0")));
    assert!(school.get("image").is_some());
}

#[rstest]
#[actix_web::test]
async fn create_keeps_supplied_device_identifiers_and_starts_offline(harness: TestHarness) {
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/schools")
        .cookie(cookie)
        .set_json(json!({
            "name": "Himalaya Secondary",
            "province": "Gandaki",
            "district": "Kaski",
            "loomaId": "LMA-CUSTOM",
            "serialNumber": "SN-XYZ",
            "status": "online"
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.pointer("/school/loomaId"), Some(&json!("LMA-CUSTOM")));
    assert_eq!(body.pointer("/school/looma/id"), Some(&json!("LMA-CUSTOM")));
    assert_eq!(body.pointer("/school/looma/serialNumber"), Some(&json!("SN-XYZ")));
    assert_eq!(body.pointer("/school/status"), Some(&json!("offline")));
}

#[rstest]
#[case(json!({ "province": "Bagmati", "district": "Lalitpur" }), "name")]
#[case(json!({ "name": "School", "province": " ", "district": "Lalitpur" }), "province")]
#[case(json!({ "name": "School", "province": "Bagmati" }), "district")]
#[actix_web::test]
async fn create_without_required_fields_writes_nothing(
    harness: TestHarness,
    #[case] payload: Value,
    #[case] field: &str,
) {
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/schools")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.pointer("/details/field"), Some(&json!(field)));
    assert_eq!(body.pointer("/details/code"), Some(&json!("missing_field")));

    let stored = harness
        .state
        .schools
        .list(SchoolFilter::default(), None)
        .await
        .expect("list");
    assert!(stored.is_empty());
}

#[rstest]
#[case(Role::Staff)]
#[case(Role::Viewer)]
#[actix_web::test]
async fn create_is_admin_only(harness: TestHarness, #[case] role: Role) {
    let cookie = harness.login_as("someone", role).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/schools")
        .cookie(cookie)
        .set_json(json!({ "name": "X", "province": "Y", "district": "Z" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case("0b7d3c8e-6a55-4f0f-9a0c-1f2d3e4f5a6b")]
#[case("42")]
#[actix_web::test]
async fn get_unknown_school_is_not_found(harness: TestHarness, #[case] id: &str) {
    let cookie = harness.login_as("viewer", Role::Viewer).await;
    let (status, body) = get_json(&harness, cookie, &format!("/api/schools/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("code"), Some(&json!("not_found")));
}

#[rstest]
#[actix_web::test]
async fn update_moves_the_device_record_with_the_looma_id(harness: TestHarness) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/schools/{}", school.id))
        .cookie(cookie)
        .set_json(json!({ "loomaId": "LMA-777777" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.get("loomaId"), Some(&json!("LMA-777777")));
    assert_eq!(body.pointer("/looma/id"), Some(&json!("LMA-777777")));
    assert_eq!(
        body.pointer("/looma/serialNumber"),
        Some(&json!(school.looma.serial_number))
    );
}

#[rstest]
#[actix_web::test]
async fn update_changes_only_given_fields(harness: TestHarness) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/schools/{}", school.id))
        .cookie(cookie)
        .set_json(json!({ "email": "office@amarjyoti.edu.np", "palika": "Vyas" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.pointer("/contact/email"), Some(&json!("office@amarjyoti.edu.np")));
    assert_eq!(body.get("palika"), Some(&json!("Vyas")));
    assert_eq!(body.get("name"), Some(&json!("Amar Jyoti School")));
    assert_eq!(body.get("status"), Some(&json!("online")));
}

#[rstest]
#[case(json!({ "status": "unplugged" }), "status")]
#[case(json!({ "latitude": 120.0 }), "latitude")]
#[case(json!({ "name": "" }), "name")]
#[actix_web::test]
async fn update_rejects_invalid_fields(
    harness: TestHarness,
    #[case] payload: Value,
    #[case] field: &str,
) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let req = actix_test::TestRequest::put()
        .uri(&format!("/api/schools/{}", school.id))
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.pointer("/details/field"), Some(&json!(field)));
}

#[rstest]
#[actix_web::test]
async fn delete_removes_school_and_reports_unknown_ids(harness: TestHarness) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("admin", Role::Admin).await;
    let app = actix_test::init_service(api_app(&harness)).await;
    let uri = format!("/api/schools/{}", school.id);

    let req = actix_test::TestRequest::delete()
        .uri(&uri)
        .cookie(cookie.clone())
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = actix_test::TestRequest::delete().uri(&uri).cookie(cookie).to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

async fn patch_status(
    harness: &TestHarness,
    cookie: Cookie<'static>,
    id: &SchoolId,
    payload: Value,
) -> StatusCode {
    let app = actix_test::init_service(api_app(harness)).await;
    let req = actix_test::TestRequest::patch()
        .uri(&format!("/api/schools/{id}/status"))
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    actix_test::call_service(&app, req).await.status()
}

async fn stored_status(harness: &TestHarness, id: &SchoolId) -> SchoolStatus {
    harness.state.schools.get(id).await.expect("school").status
}

#[rstest]
#[case(Role::Admin)]
#[case(Role::Staff)]
#[actix_web::test]
async fn status_patch_updates_for_operators(harness: TestHarness, #[case] role: Role) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("operator", role).await;
    let status = patch_status(&harness, cookie, &school.id, json!({ "status": "maintenance" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_status(&harness, &school.id).await, SchoolStatus::Maintenance);
}

#[rstest]
#[case(json!({ "status": "rebooting" }))]
#[case(json!({ "status": "ONLINE" }))]
#[case(json!({ "status": "" }))]
#[case(json!({}))]
#[actix_web::test]
async fn status_patch_rejects_unknown_values_without_writing(
    harness: TestHarness,
    #[case] payload: Value,
) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("staff", Role::Staff).await;
    let status = patch_status(&harness, cookie, &school.id, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stored_status(&harness, &school.id).await, SchoolStatus::Online);
}

#[rstest]
#[actix_web::test]
async fn status_patch_is_forbidden_for_viewers(harness: TestHarness) {
    let school = harness
        .seed_school("Amar Jyoti School", "Gandaki", "Tanahun", SchoolStatus::Online)
        .await;
    let cookie = harness.login_as("viewer", Role::Viewer).await;
    let status = patch_status(&harness, cookie, &school.id, json!({ "status": "offline" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(stored_status(&harness, &school.id).await, SchoolStatus::Online);
}

#[rstest]
#[actix_web::test]
async fn status_patch_on_missing_school_is_not_found(harness: TestHarness) {
    let cookie = harness.login_as("staff", Role::Staff).await;
    let id = SchoolId::new("0b7d3c8e-6a55-4f0f-9a0c-1f2d3e4f5a6b").expect("id");
    let status = patch_status(&harness, cookie, &id, json!({ "status": "online" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
fn sort_state_defaults_field_and_direction() {
    assert_eq!(sort_state(None, None).expect("sort"), None);
    assert_eq!(
        sort_state(Some("lastSeen"), None).expect("sort"),
        Some(SortState::new(SortField::LastSeen, SortDirection::Asc))
    );
    assert_eq!(
        sort_state(Some(" "), Some("desc")).expect("sort"),
        Some(SortState::new(SortField::Name, SortDirection::Desc))
    );
}

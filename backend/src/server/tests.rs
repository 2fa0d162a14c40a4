//! In-process tests for the assembled HTTP surface.

use super::*;
use crate::domain::TRACE_ID_HEADER;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test};
use base64::{Engine, engine::general_purpose::STANDARD};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn basic(pair: &str) -> (&'static str, String) {
    ("Authorization", format!("Basic {}", STANDARD.encode(pair)))
}

#[fixture]
fn deps() -> AppDependencies {
    let mut deps = AppDependencies::from_config(&AppConfig::default());
    deps.check_health = Arc::new(HealthService::new(Arc::new(SystemHealthChecker::new(
        vec![Arc::new(ApplicationProbe)],
        Arc::new(DefaultClock),
    ))));
    deps
}

async fn app(
    deps: &AppDependencies,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let routes = build_adapter(deps, AdapterConfig::default()).routes();
    actix_test::init_service(App::new().configure(|cfg| routes.configure(cfg))).await
}

#[rstest]
#[actix_web::test]
async fn created_users_can_be_fetched(deps: AppDependencies) {
    let app = app(&deps).await;

    let create = actix_test::TestRequest::post()
        .uri("/api/users")
        .insert_header(basic("admin:password"))
        .set_json(json!({ "email": " Ada@Example.COM ", "name": " Ada " }))
        .to_request();
    let res = actix_test::call_service(&app, create).await;
    assert_eq!(res.status().as_u16(), 201);
    let location = res
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("location header");
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["location"], json!(location));

    let fetch = actix_test::TestRequest::get()
        .uri(&location)
        .insert_header(basic("user:secret"))
        .to_request();
    let user: Value = actix_test::call_and_read_body_json(&app, fetch).await;
    assert_eq!(
        user,
        json!({ "id": created["id"], "email": "ada@example.com", "name": "Ada" })
    );
}

#[rstest]
#[actix_web::test]
async fn duplicate_emails_conflict_case_insensitively(deps: AppDependencies) {
    let app = app(&deps).await;
    for (email, expected) in [("ada@example.com", 201), ("ADA@example.com", 409)] {
        let req = actix_test::TestRequest::post()
            .uri("/api/users")
            .insert_header(basic("admin:password"))
            .set_json(json!({ "email": email, "name": "Ada" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), expected, "email {email}");
    }
}

#[rstest]
#[actix_web::test]
async fn user_routes_require_credentials(deps: AppDependencies) {
    let app = app(&deps).await;

    let req = actix_test::TestRequest::get().uri("/api/users/1").to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 401);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("UnauthorizedError"));
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_web::test]
async fn public_routes_need_no_credentials(deps: AppDependencies) {
    let app = app(&deps).await;

    let health = actix_test::TestRequest::get().uri("/api/health").to_request();
    let res = actix_test::call_service(&app, health).await;
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["checks"][0]["name"], json!("application"));

    let root = actix_test::TestRequest::get().uri("/").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, root).await;
    assert_eq!(body["endpoints"]["users"], json!("/api/users"));
}

#[rstest]
#[actix_web::test]
async fn missing_users_are_not_found(deps: AppDependencies) {
    let app = app(&deps).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/users/does-not-exist")
        .insert_header(basic("admin:password"))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 404);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], json!("User with ID does-not-exist not found"));
}

#[rstest]
fn adapter_config_carries_shutdown_timeout() {
    let config = AppConfig {
        shutdown_timeout_secs: 3,
        ..AppConfig::default()
    };
    assert_eq!(adapter_config(&config).shutdown_timeout_secs, 3);
}

//! Behaviour tests for the assembled API over a real listener.
//!
//! These scenarios confirm that users created through `POST /api/users` can
//! be fetched back, that user routes require Basic credentials and return
//! trace identifiers on unauthorised responses, and that health and unknown
//! routes answer with the documented shapes.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[path = "support/harness.rs"]
mod harness;

use actix_web::http::{Method, header};
use awc::Client;
use base64::{Engine, engine::general_purpose::STANDARD};
use harness::{SharedWorld, WorldFixture, with_world_async};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use sprint_zero::domain::TRACE_ID_HEADER;

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

struct RequestSpec<'a> {
    method: Method,
    path: &'a str,
    payload: Option<Value>,
    label: &'a str,
}

fn perform_request(world: &SharedWorld, spec: RequestSpec<'_>) {
    let RequestSpec {
        method,
        path,
        payload,
        label,
    } = spec;
    let credentials = world.borrow().credentials.clone();
    let (status, trace_id, location, body) = with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(credentials) = credentials {
            request = request.insert_header((
                header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode(credentials)),
            ));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect(label),
            None => request.send().await.expect(label),
        };
        let header_value = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let status = response.status().as_u16();
        let trace_id = header_value(TRACE_ID_HEADER);
        let location = header_value(header::LOCATION.as_str());
        let body = response.body().await.expect(label);
        let json: Value = serde_json::from_slice(&body).expect(label);
        (status, trace_id, location, json)
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_location = location;
    ctx.last_body = Some(body);
}

fn last_body(world: &SharedWorld) -> Value {
    world.borrow().last_body.clone().expect("response body")
}

#[given("the client authenticates as {username} with password {password}")]
fn the_client_authenticates(world: &WorldFixture, username: String, password: String) {
    world.world().borrow_mut().credentials = Some(format!("{username}:{password}"));
}

#[when("the client creates a user with email {email} and name {name}")]
fn the_client_creates_a_user(world: &WorldFixture, email: String, name: String) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::POST,
            path: "/api/users",
            payload: Some(json!({ "email": email, "name": name })),
            label: "create user request",
        },
    );
}

#[when("the client fetches the created user")]
fn the_client_fetches_the_created_user(world: &WorldFixture) {
    let world = world.world();
    let location = world
        .borrow()
        .last_location
        .clone()
        .expect("location from create");
    perform_request(
        &world,
        RequestSpec {
            method: Method::GET,
            path: &location,
            payload: None,
            label: "fetch created user request",
        },
    );
}

#[when("the client fetches the user {id}")]
fn the_client_fetches_the_user(world: &WorldFixture, id: String) {
    let path = format!("/api/users/{id}");
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::GET,
            path: &path,
            payload: None,
            label: "fetch user request",
        },
    );
}

#[when("the client requests the health report")]
fn the_client_requests_the_health_report(world: &WorldFixture) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::GET,
            path: "/api/health",
            payload: None,
            label: "health request",
        },
    );
}

#[when("the client requests the path {path}")]
fn the_client_requests_the_path(world: &WorldFixture, path: String) {
    perform_request(
        &world.world(),
        RequestSpec {
            method: Method::GET,
            path: &path,
            payload: None,
            label: "path request",
        },
    );
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    assert_eq!(world.world().borrow().last_status, Some(status));
}

#[then("the response includes a location for the new user")]
fn the_response_includes_a_location(world: &WorldFixture) {
    let world = world.world();
    let body = last_body(&world);
    let id = body.get("id").and_then(Value::as_str).expect("created id");
    let expected = format!("/api/users/{id}");

    assert_eq!(world.borrow().last_location.as_deref(), Some(expected.as_str()));
    assert_eq!(
        body.get("location").and_then(Value::as_str),
        Some(expected.as_str())
    );
}

#[then("the fetched user has email {email} and name {name}")]
fn the_fetched_user_has(world: &WorldFixture, email: String, name: String) {
    let body = last_body(&world.world());
    assert_eq!(body.get("email").and_then(Value::as_str), Some(email.as_str()));
    assert_eq!(body.get("name").and_then(Value::as_str), Some(name.as_str()));
}

#[then("the error code is {code}")]
fn the_error_code_is(world: &WorldFixture, code: String) {
    let body = last_body(&world.world());
    assert_eq!(body.get("error").and_then(Value::as_str), Some(code.as_str()));
}

#[then("the error message is {message}")]
fn the_error_message_is(world: &WorldFixture, message: String) {
    let body = last_body(&world.world());
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(message.as_str())
    );
}

#[then("the response is unauthorised with a trace id")]
fn the_response_is_unauthorised_with_a_trace_id(world: &WorldFixture) {
    let ctx = world.world();
    let ctx = ctx.borrow();
    assert_eq!(ctx.last_status, Some(401));

    let trace_id = ctx.last_trace_id.as_deref().expect("trace id header");
    let body = ctx.last_body.as_ref().expect("error body");
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(trace_id));
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some("UnauthorizedError")
    );
}

#[then("the health report is {status}")]
fn the_health_report_is(world: &WorldFixture, status: String) {
    let body = last_body(&world.world());
    assert_eq!(body.get("status").and_then(Value::as_str), Some(status.as_str()));
    let names: Vec<_> = body
        .get("checks")
        .and_then(Value::as_array)
        .expect("checks array")
        .iter()
        .filter_map(|check| check.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, ["application"]);
}

#[scenario(
    path = "tests/features/user_api.feature",
    name = "Creating a user and fetching it back"
)]
fn creating_a_user_and_fetching_it_back(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_api.feature",
    name = "Duplicate emails conflict regardless of case"
)]
fn duplicate_emails_conflict(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_api.feature",
    name = "User routes reject anonymous requests"
)]
fn user_routes_reject_anonymous_requests(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_api.feature",
    name = "User routes reject wrong passwords"
)]
fn user_routes_reject_wrong_passwords(world: WorldFixture) {
    drop(world);
}

#[scenario(path = "tests/features/user_api.feature", name = "Health is public")]
fn health_is_public(world: WorldFixture) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_api.feature",
    name = "Unknown routes return the error envelope"
)]
fn unknown_routes_return_the_error_envelope(world: WorldFixture) {
    drop(world);
}

//! Tests for HTTP error rendering.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

fn render(error: &Error) -> (u16, Value) {
    let mut res = HttpResponse::new();
    write_error(&mut res, error);
    let body = res.json_body().cloned().expect("json body");
    (res.status_code(), body)
}

#[rstest]
#[case(Error::validation("bad"), 400, "ValidationError")]
#[case(Error::unauthorized("no auth"), 401, "UnauthorizedError")]
#[case(Error::not_found("missing"), 404, "NotFoundError")]
#[case(Error::conflict("dup"), 409, "ConflictError")]
#[case(Error::internal("boom"), 500, "InternalServerError")]
fn status_and_code_follow_error_code(
    #[case] error: Error,
    #[case] status: u16,
    #[case] code: &str,
) {
    let (observed, body) = render(&error);
    assert_eq!(observed, status);
    assert_eq!(body["error"], json!(code));
    assert!(body["timestamp"].is_string());
}

#[rstest]
fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("database password is hunter2")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "x" }));

    let (_, body) = render(&error);
    assert_eq!(body["message"], json!(REDACTED_MESSAGE));
    assert_eq!(body["traceId"], json!(expected_trace_id));
    assert!(body.get("details").is_none());
}

#[rstest]
fn client_errors_keep_message_and_details() {
    let error = Error::validation("Email and name are required")
        .with_details(json!({ "field": "email" }));

    let (_, body) = render(&error);
    assert_eq!(body["message"], json!("Email and name are required"));
    assert_eq!(body["details"], json!({ "field": "email" }));
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[tokio::test]
async fn trace_id_in_scope_is_used_when_error_has_none(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = Error::not_found("missing");
    let (_, body) = TraceId::scope(trace_id, async move { render(&error) }).await;
    assert_eq!(body["traceId"], json!(expected_trace_id));
}

#[rstest]
fn envelope_round_trips_through_json() {
    let envelope = ErrorEnvelope::new(ErrorCode::Internal, "Authentication failed");
    let mut res = HttpResponse::new();
    write_envelope(&mut res, 500, &envelope);

    let parsed: ErrorEnvelope =
        serde_json::from_value(res.json_body().cloned().expect("json body")).expect("envelope");
    assert_eq!(parsed.error, ErrorCode::Internal);
    assert_eq!(parsed.message, "Authentication failed");
}

//! Request tracing middleware.
//!
//! Each request receives a fresh [`TraceId`], echoed in the `trace-id`
//! response header and kept in task-local scope while the rest of the chain
//! runs, so logs and error envelopes can be correlated.

use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{Error, TRACE_ID_HEADER, TraceId};
use crate::inbound::http::adapter::{HttpRequest, HttpResponse, Middleware, Next};
use crate::inbound::http::error::write_error;

/// Assigns a trace identifier and logs method, path, status and latency.
///
/// Register it first so every other middleware runs inside its scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTrace;

#[async_trait]
impl Middleware for RequestTrace {
    async fn handle(
        &self,
        req: &mut HttpRequest,
        res: &mut HttpResponse,
        next: Next<'_>,
    ) -> Result<(), Error> {
        let trace_id = TraceId::generate();
        let started = Instant::now();
        res.set_header(TRACE_ID_HEADER, trace_id.to_string());

        let outcome = TraceId::scope(trace_id, next.run(req, res)).await;
        if let Err(err) = outcome {
            write_error(res, &err.with_trace_id(trace_id.to_string()));
        }

        info!(
            trace_id = %trace_id,
            method = %req.method,
            path = %req.path,
            status = res.status_code(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use super::*;
    use crate::inbound::http::adapter::{Handler, HttpMethod, Pipeline};
    use rstest::rstest;
    use serde_json::json;

    struct ReportTrace;

    #[async_trait]
    impl Handler for ReportTrace {
        async fn handle(&self, _req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
            let current = TraceId::current().map(|id| id.to_string());
            res.json(json!({ "traceId": current }));
            Ok(())
        }
    }

    struct Reject;

    #[async_trait]
    impl Handler for Reject {
        async fn handle(&self, _req: &mut HttpRequest, _res: &mut HttpResponse) -> Result<(), Error> {
            Err(Error::conflict("already there"))
        }
    }

    async fn run(handler: Arc<dyn Handler>) -> HttpResponse {
        let global: Vec<Arc<dyn Middleware>> = vec![Arc::new(RequestTrace)];
        let pipeline = Pipeline::new(&global, &[], handler);
        let mut req = HttpRequest::new(HttpMethod::Get, "/traced");
        let mut res = HttpResponse::new();
        pipeline.dispatch(&mut req, &mut res).await;
        res
    }

    #[rstest]
    #[tokio::test]
    async fn header_matches_trace_id_in_scope() {
        let res = run(Arc::new(ReportTrace)).await;

        let header = res.header_value(TRACE_ID_HEADER).expect("trace-id header");
        header.parse::<TraceId>().expect("header is a UUID");
        let body = res.json_body().expect("json body");
        assert_eq!(body["traceId"], json!(header));
    }

    #[rstest]
    #[tokio::test]
    async fn error_envelopes_carry_the_trace_id() {
        let res = run(Arc::new(Reject)).await;

        assert_eq!(res.status_code(), 409);
        let header = res.header_value(TRACE_ID_HEADER).expect("trace-id header");
        let body = res.json_body().expect("json body");
        assert_eq!(body["traceId"], json!(header));
        assert_eq!(body["error"], json!("ConflictError"));
    }

    #[rstest]
    #[tokio::test]
    async fn each_request_gets_a_new_trace_id() {
        let first = run(Arc::new(ReportTrace)).await;
        let second = run(Arc::new(ReportTrace)).await;
        assert_ne!(
            first.header_value(TRACE_ID_HEADER),
            second.header_value(TRACE_ID_HEADER)
        );
    }
}

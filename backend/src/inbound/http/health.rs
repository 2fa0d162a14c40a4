//! Health controller.
//!
//! ```text
//! GET /api/health
//! ```
//!
//! The body is always the aggregated report. Healthy and degraded systems
//! answer `200 OK`; an unhealthy system answers `503 Service Unavailable`
//! so load balancers can take the instance out of rotation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::application::CheckHealth;
use crate::domain::{Error, HealthStatus, SystemHealth};
use crate::inbound::http::adapter::{Handler, HttpRequest, HttpResponse};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::SystemHealthSchema;

/// HTTP status for an overall health status.
pub fn status_for(health: &SystemHealth) -> u16 {
    match health.status() {
        HealthStatus::Healthy | HealthStatus::Degraded => 200,
        HealthStatus::Unhealthy => 503,
    }
}

/// Binds [`health`] to a [`CheckHealth`] use case.
#[derive(Clone)]
pub struct HealthHandler {
    use_case: Arc<dyn CheckHealth>,
}

impl HealthHandler {
    pub fn new(use_case: Arc<dyn CheckHealth>) -> Self {
        Self { use_case }
    }
}

#[async_trait]
impl Handler for HealthHandler {
    async fn handle(&self, _req: &mut HttpRequest, res: &mut HttpResponse) -> Result<(), Error> {
        health(self, res).await
    }
}

/// Report aggregated service health.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy or degraded", body = SystemHealthSchema),
        (status = 503, description = "Service unhealthy", body = SystemHealthSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["health"],
    operation_id = "health",
    security([])
)]
pub async fn health(handler: &HealthHandler, res: &mut HttpResponse) -> Result<(), Error> {
    let report = handler.use_case.execute().await;
    let status = status_for(&report);
    if status != 200 {
        warn!(status = %report.status(), "reporting unhealthy service");
    }
    let body = serde_json::to_value(&report)
        .map_err(|err| Error::internal(format!("failed to serialise health report: {err}")))?;
    res.status(status).json(body);
    Ok(())
}

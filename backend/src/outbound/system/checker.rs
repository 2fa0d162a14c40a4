//! Concurrent probe runner.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{HealthChecker, HealthProbe, ProbeReport};
use crate::domain::{HealthCheck, HealthStatus, SystemHealth};

/// Runs every probe concurrently and aggregates the checks in probe order.
#[derive(Clone)]
pub struct SystemHealthChecker {
    probes: Vec<Arc<dyn HealthProbe>>,
    clock: Arc<dyn Clock>,
}

impl SystemHealthChecker {
    /// Create a checker over `probes`, timestamping with `clock`.
    pub fn new(probes: Vec<Arc<dyn HealthProbe>>, clock: Arc<dyn Clock>) -> Self {
        Self { probes, clock }
    }

    async fn run_probe(&self, probe: &dyn HealthProbe) -> HealthCheck {
        let name = probe.name();
        let outcome = AssertUnwindSafe(probe.probe()).catch_unwind().await;
        let report = match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(error)) => failure_report(name, &error.to_string()),
            Err(payload) => failure_report(name, &panic_message(payload.as_ref())),
        };
        if report.status != HealthStatus::Healthy {
            warn!(probe = name, status = %report.status, message = %report.message, "probe not healthy");
        }

        let at = self.clock.utc();
        match HealthCheck::try_new(name, report.status, at) {
            Ok(check) => check.with_message(report.message),
            Err(error) => {
                warn!(error = %error, "probe reported a blank name");
                HealthCheck::unnamed(at).with_message(format!(
                    "Probe reported a blank name: {}",
                    report.message
                ))
            }
        }
    }
}

fn failure_report(name: &str, error: &str) -> ProbeReport {
    ProbeReport::new(
        HealthStatus::Unhealthy,
        format!("{} check failed: {error}", capitalise(name)),
    )
}

fn capitalise(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "probe panicked".to_owned()
    }
}

#[async_trait]
impl HealthChecker for SystemHealthChecker {
    async fn check_health(&self) -> SystemHealth {
        let checks = join_all(
            self.probes
                .iter()
                .map(|probe| self.run_probe(probe.as_ref())),
        )
        .await;
        SystemHealth::aggregate(checks, self.clock.utc())
    }
}

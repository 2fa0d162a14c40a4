//! Health use case.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::SystemHealth;
use crate::domain::ports::HealthChecker;

/// Driving port for health reporting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckHealth: Send + Sync {
    /// Produce the current health report.
    async fn execute(&self) -> SystemHealth;
}

/// Service delegating to a [`HealthChecker`].
#[derive(Clone)]
pub struct HealthService {
    checker: Arc<dyn HealthChecker>,
}

impl HealthService {
    /// Create a new service with the given checker.
    pub fn new(checker: Arc<dyn HealthChecker>) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl CheckHealth for HealthService {
    async fn execute(&self) -> SystemHealth {
        self.checker.check_health().await
    }
}

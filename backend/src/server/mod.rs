//! Composition root.
//!
//! Builds the object graph once at startup and hands each controller its
//! dependencies through constructors. Tests swap individual entries of
//! [`AppDependencies`] for fakes.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::application::{
    CheckHealth, CreateUser, CreateUserService, GetUser, GetUserService, HealthService,
};
use crate::config::AppConfig;
use crate::domain::ports::{Authenticator, HealthProbe};
use crate::inbound::http::adapter::actix::{ActixServerAdapter, AdapterConfig};
use crate::inbound::http::adapter::{Middleware, ServerAdapter};
use crate::inbound::http::middleware::{BasicAuth, RequestTrace};
use crate::inbound::http::root::ServiceInfo;
use crate::inbound::http::routes::{health_routes, root_routes, user_routes};
use crate::outbound::persistence::InMemoryUserRepository;
use crate::outbound::security::StaticAuthenticator;
use crate::outbound::system::{
    ApplicationProbe, InstantUptime, MemoryProbe, SysinfoMemorySampler, SystemHealthChecker,
    UptimeProbe,
};

/// Use cases and ports the HTTP layer depends on.
#[derive(Clone)]
pub struct AppDependencies {
    pub create_user: Arc<dyn CreateUser>,
    pub get_user: Arc<dyn GetUser>,
    pub check_health: Arc<dyn CheckHealth>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppDependencies {
    /// Production wiring: one in-memory repository shared by both user use
    /// cases, system probes for health, and the configured accounts.
    pub fn from_config(config: &AppConfig) -> Self {
        let repository = Arc::new(InMemoryUserRepository::new());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let probes: Vec<Arc<dyn HealthProbe>> = vec![
            Arc::new(MemoryProbe::new(
                Arc::new(SysinfoMemorySampler::new()),
                config.memory_threshold_mb,
            )),
            Arc::new(UptimeProbe::new(Arc::new(InstantUptime::start()))),
            Arc::new(ApplicationProbe),
        ];
        let authenticator = StaticAuthenticator::new(
            config
                .auth_users
                .iter()
                .map(|creds| (creds.username(), creds.password())),
        );
        debug!(users = authenticator.len(), "configured Basic auth accounts");

        Self {
            create_user: Arc::new(CreateUserService::new(repository.clone(), repository.clone())),
            get_user: Arc::new(GetUserService::new(repository)),
            check_health: Arc::new(HealthService::new(Arc::new(SystemHealthChecker::new(
                probes, clock,
            )))),
            authenticator: Arc::new(authenticator),
        }
    }
}

/// Register the global middleware and every route on `adapter`.
pub fn register_routes(adapter: &mut impl ServerAdapter, deps: &AppDependencies) {
    adapter.add_middleware(Arc::new(RequestTrace));

    let auth: Arc<dyn Middleware> = Arc::new(BasicAuth::new(deps.authenticator.clone()));
    let routes = root_routes(ServiceInfo::default())
        .into_iter()
        .chain(health_routes(deps.check_health.clone()))
        .chain(user_routes(
            deps.create_user.clone(),
            deps.get_user.clone(),
            auth,
        ));
    for route in routes {
        adapter.add_route(route);
    }
}

/// Adapter tuning derived from process configuration.
pub fn adapter_config(config: &AppConfig) -> AdapterConfig {
    AdapterConfig {
        shutdown_timeout_secs: config.shutdown_timeout_secs,
        ..AdapterConfig::default()
    }
}

/// actix-web adapter with every route registered.
pub fn build_adapter(deps: &AppDependencies, config: AdapterConfig) -> ActixServerAdapter {
    let mut adapter = ActixServerAdapter::new(config);
    register_routes(&mut adapter, deps);
    adapter
}

#[cfg(test)]
mod tests;

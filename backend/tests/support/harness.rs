//! Live server harness and shared world for the API behaviour suite.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` stops the server
//! even if a step panics.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use sprint_zero::application::HealthService;
use sprint_zero::config::AppConfig;
use sprint_zero::inbound::http::adapter::ServerAdapter;
use sprint_zero::inbound::http::adapter::actix::{ActixServerAdapter, AdapterConfig};
use sprint_zero::outbound::system::{ApplicationProbe, SystemHealthChecker};
use sprint_zero::server::{AppDependencies, build_adapter};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) struct ApiWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) adapter: Option<ActixServerAdapter>,
    pub(crate) credentials: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) last_location: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<ApiWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(&self.world);
    }
}

fn shutdown(world: &SharedWorld) {
    let mut ctx = world.borrow_mut();
    let Some(mut adapter) = ctx.adapter.take() else {
        return;
    };
    ctx.local.block_on(&ctx.runtime, async move {
        adapter.stop().await;
    });
}

/// Run `operation` against the live server on the world's runtime.
///
/// The world stays borrowed while the future runs, so the future must not
/// touch it.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    (runtime, LocalSet::new())
}

/// Default wiring with host-independent health probes.
fn test_dependencies() -> AppDependencies {
    let mut deps = AppDependencies::from_config(&AppConfig::default());
    deps.check_health = Arc::new(HealthService::new(Arc::new(SystemHealthChecker::new(
        vec![Arc::new(ApplicationProbe)],
        Arc::new(DefaultClock),
    ))));
    deps
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let config = AdapterConfig {
        workers: Some(1),
        shutdown_timeout_secs: 1,
        ..AdapterConfig::default()
    };
    let mut adapter = build_adapter(&test_dependencies(), config);
    let addr = local
        .block_on(&runtime, adapter.start("127.0.0.1:0"))
        .expect("server should start");

    let world = Rc::new(RefCell::new(ApiWorld {
        runtime,
        local,
        base_url: format!("http://{addr}"),
        adapter: Some(adapter),
        credentials: None,
        last_status: None,
        last_body: None,
        last_trace_id: None,
        last_location: None,
    }));

    WorldFixture { world }
}

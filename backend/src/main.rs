//! Backend entry-point: reads configuration, wires dependencies and serves
//! HTTP until SIGINT or SIGTERM.

use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sprint_zero::config::AppConfig;
use sprint_zero::inbound::http::adapter::ServerAdapter;
use sprint_zero::server::{AppDependencies, adapter_config, build_adapter};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = AppConfig::from_env(&DefaultEnv::new()).wrap_err("invalid configuration")?;
    init_tracing(&config.log_level);

    let deps = AppDependencies::from_config(&config);
    let mut adapter = build_adapter(&deps, adapter_config(&config));
    let bind_addr = config.bind_addr();
    let addr = adapter
        .start(&bind_addr)
        .await
        .wrap_err_with(|| format!("failed to start server on {bind_addr}"))?;

    info!(addr = %addr, "server running");
    info!(environment = %config.env, "environment");
    info!(url = %format!("http://{addr}/api/health"), "health check");

    let signal = shutdown_signal().await;
    info!(signal, "starting graceful shutdown");
    adapter.stop().await;
    info!("server closed");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let (filter, invalid) = match EnvFilter::try_new(log_level) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err)),
    };
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
    if let Some(err) = invalid {
        warn!(log_level, error = %err, "invalid LOG_LEVEL; defaulting to info");
    }
}

/// Resolve when the process receives SIGINT or SIGTERM; returns the signal
/// name.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}

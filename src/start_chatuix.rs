//! Startup helpers for the ChatUIX server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::server::{self, AppState, ServerConfig};

/// Install the global tracing subscriber (`RUST_LOG` aware, INFO by default).
///
/// A subscriber installed earlier stays in place; the conflict is logged through it.
pub fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init()
    {
        tracing::warn!("Tracing subscriber not installed: {e}");
    }
}

/// Run the server (used by the `chatuix-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting ChatUIX v{}", env!("CARGO_PKG_VERSION"));

    let state = match initialize() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server_with_shutdown(state, shutdown_signal())) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("ChatUIX stopped");
    ExitCode::SUCCESS
}

/// Build application state from the environment without starting the server.
///
/// # Errors
/// Returns an error if the configuration is invalid.
pub fn initialize() -> Result<Arc<AppState>, server::ConfigError> {
    let config = ServerConfig::from_env()?;
    tracing::info!(
        "Binding {} (max {} sessions, static dir: {})",
        config.addr(),
        config.max_sessions,
        config
            .static_dir
            .as_ref()
            .map_or_else(|| "none".to_string(), |d| d.display().to_string())
    );
    Ok(AppState::new(config))
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl+C handler failed: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

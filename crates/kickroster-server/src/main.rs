mod api;
mod middleware;

use std::sync::Arc;

use kickroster_resolver::ProfileResolver;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = kickroster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "configuration loaded");

    let players = kickroster_core::resolve_roster(config.players_path.as_deref())?;
    let resolver = ProfileResolver::from_config(&config)?;
    if !config.has_secondary_key() {
        tracing::info!("PILOTERR_API_KEY not set; secondary profile source disabled");
    }

    let app = build_app(AppState {
        resolver: Arc::new(resolver),
        players: players.into(),
        public_dir: config.public_dir.clone(),
        has_secondary_key: config.has_secondary_key(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let port = listener.local_addr()?.port();
    tracing::info!(addr = %config.bind_addr, "server running on http://localhost:{port}");
    tracing::info!("  menu:  http://localhost:{port}/");
    tracing::info!("  game:  http://localhost:{port}/game");
    tracing::info!("  debug: http://localhost:{port}/_debug");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

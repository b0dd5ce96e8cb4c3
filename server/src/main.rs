mod app;
mod config;
mod content;
mod routes;
mod state;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::content::ContentStore;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = config::data_dir();
    let static_dir = config::static_dir();
    tracing::info!(data_dir = %data_dir.display(), "Loading map content...");
    let content = match ContentStore::load(&data_dir).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start with invalid map content");
            std::process::exit(1);
        }
    };
    let summary = content.summary();
    tracing::info!(
        version = %summary.version,
        entries = summary.entries,
        citations = summary.citations,
        features = summary.features,
        "Map content validated"
    );
    if summary.unresolved_citations > 0 {
        tracing::warn!(
            unresolved = summary.unresolved_citations,
            "some citation ids do not resolve and will be skipped in tooltips"
        );
    }

    let app = app::build_app(AppState::new(content), &static_dir);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!(static_dir = %static_dir.display(), "Recognition map server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

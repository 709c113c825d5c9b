//! HTTP server for insurance premium predictions.
//!
//! ```text
//! premium-server --model-dir ./models --port 7860
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use premium::config::ServeConfig;
use premium::logging::init_tracing;
use premium::service::router;
use premium::PremiumPredictor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServeConfig::parse();
    init_tracing(&config.log_filter);

    let addr = config
        .bind_addr()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    info!(
        %addr,
        model_dir = %config.models.model_dir.display(),
        linear_scaling = ?config.models.linear_scaling,
        "starting premium-server"
    );

    let predictor = PremiumPredictor::load(
        &config.models.artifact_paths(),
        config.models.linear_scaling,
    );
    if predictor.registry().is_empty() {
        warn!("no models loaded; /predict will fail until artifacts are provided");
    }

    let app = router(Arc::new(predictor));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
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
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

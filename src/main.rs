//! Emotion Detector — Binary Entrypoint
//! Loads configuration, boots tracing, and serves the Axum router.

use anyhow::Context;
use emotion_detector::{build_app, metrics::Metrics, ServiceConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` for structured output.
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("emotion_detector=info,tower_http=warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ServiceConfig::load().context("loading service config")?;

    let mut app = build_app(&cfg)?;
    if cfg.metrics_enabled {
        let metrics = Metrics::init()?;
        app = app.merge(metrics.router());
        info!("metrics exposed at /metrics");
    }

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "emotion detector listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

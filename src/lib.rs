// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod config;
pub mod detector;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Emotion, EmotionReport, EmotionScores, Score};
pub use crate::api::{router, AppState, INVALID_TEXT_MESSAGE};
pub use crate::config::ServiceConfig;
pub use crate::detector::{DetectError, DynDetector, EmotionDetector, WatsonClient};

use std::sync::Arc;

use axum::Router;
use tracing::info;

/// Build the full router wired to the configured remote service.
/// Metrics are left to the caller, the recorder being process-wide.
pub fn build_app(cfg: &ServiceConfig) -> anyhow::Result<Router> {
    let client = WatsonClient::new(&cfg.emotion_api)?;
    info!(endpoint = client.endpoint(), "emotion client ready");
    Ok(router(AppState::new(Arc::new(client))))
}

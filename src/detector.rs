//! Emotion client: the single outbound call to the remote scoring service.
//!
//! `EmotionDetector` is the seam handlers depend on. `detect` keeps the full
//! failure taxonomy for logs and tests; `analyze` narrows it to the
//! all-or-nothing record the rest of the app works with.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analyze::{normalize, EmotionReport, NormalizeError};
use crate::config::EmotionApiConfig;

/// Header carrying the model identifier expected by the remote runtime.
pub const MODEL_ID_HEADER: &str = "grpc-metadata-mm-model-id";

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("input text is blank")]
    BlankInput,
    #[error("emotion service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("emotion service rejected the input as unprocessable (400)")]
    Unprocessable,
    #[error("emotion service returned {0}")]
    Status(StatusCode),
    #[error("emotion service body is not JSON: {0}")]
    Body(#[from] serde_json::Error),
    #[error("emotion service body has no usable scores: {0}")]
    Normalize(#[from] NormalizeError),
}

impl DetectError {
    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DetectError::BlankInput => "blank_input",
            DetectError::Transport(_) => "transport",
            DetectError::Unprocessable => "unprocessable",
            DetectError::Status(_) => "status",
            DetectError::Body(_) => "body",
            DetectError::Normalize(e) => e.kind(),
        }
    }
}

/// Anything that can turn text into an emotion report.
#[async_trait]
pub trait EmotionDetector: Send + Sync {
    /// One attempt, no retry.
    async fn detect(&self, text: &str) -> Result<EmotionReport, DetectError>;

    /// Name for diagnostics.
    fn name(&self) -> &'static str;

    /// Like `detect`, but every failure becomes `None` (the "unavailable"
    /// record). Never propagates an error.
    async fn analyze(&self, text: &str) -> Option<EmotionReport> {
        match self.detect(text).await {
            Ok(report) => Some(report),
            Err(e) => {
                counter!("emotion_upstream_errors_total", "kind" => e.kind()).increment(1);
                warn!(
                    detector = self.name(),
                    kind = e.kind(),
                    error = %e,
                    "emotion detection unavailable"
                );
                None
            }
        }
    }
}

/// Convenient alias used by the router state.
pub type DynDetector = Arc<dyn EmotionDetector>;

#[derive(Serialize)]
struct RawDocument<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    raw_document: RawDocument<'a>,
}

/// Client for the Watson NLP `EmotionPredict` endpoint.
#[derive(Debug, Clone)]
pub struct WatsonClient {
    http: reqwest::Client,
    url: String,
    model_id: HeaderValue,
}

impl WatsonClient {
    pub fn new(cfg: &EmotionApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("emotion-detector/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building HTTP client")?;
        let model_id = HeaderValue::from_str(&cfg.model_id)
            .with_context(|| format!("model id {:?} is not a valid header value", cfg.model_id))?;
        Ok(Self {
            http,
            url: cfg.url.clone(),
            model_id,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmotionDetector for WatsonClient {
    async fn detect(&self, text: &str) -> Result<EmotionReport, DetectError> {
        if text.trim().is_empty() {
            return Err(DetectError::BlankInput);
        }

        // Length only; the text itself stays out of the logs.
        debug!(url = %self.url, chars = text.chars().count(), "requesting emotion scores");
        let started = Instant::now();
        let sent = self
            .http
            .post(&self.url)
            .header(MODEL_ID_HEADER, self.model_id.clone())
            .json(&PredictRequest {
                raw_document: RawDocument { text },
            })
            .send()
            .await;
        histogram!("emotion_upstream_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);
        let resp = sent?;

        match resp.status() {
            StatusCode::BAD_REQUEST => return Err(DetectError::Unprocessable),
            status if !status.is_success() => return Err(DetectError::Status(status)),
            _ => {}
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let scores = normalize(&body)?;
        let report = EmotionReport::from_scores(scores);
        debug!(dominant = %report.dominant_emotion, "emotion scores received");
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "watson"
    }
}

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use metrics::counter;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::analyze::EmotionReport;
use crate::detector::{DynDetector, EmotionDetector};

/// Shown for blank input and for every remote failure alike.
pub const INVALID_TEXT_MESSAGE: &str = "Invalid text! Please try again!";

/// Query parameter carrying the statement.
const TEXT_PARAM: &str = "textToAnalyze";

// Both assets ship inside the binary; nothing is read from the working directory.
const INDEX_HTML: &str = include_str!("../templates/index.html");
const PAGE_SCRIPT: &str = include_str!("../static/mywebscript.js");

#[derive(Clone)]
pub struct AppState {
    detector: DynDetector,
}

impl AppState {
    pub fn new(detector: DynDetector) -> Self {
        Self { detector }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/emotionDetector", get(emotion_detector))
        .route("/health", get(|| async { "ok" }))
        .route("/static/mywebscript.js", get(page_script))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn page_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        PAGE_SCRIPT,
    )
}

// Always 200; failures are reported in the body. Pairs are taken as a list
// so a repeated parameter is not a rejection: the first one wins.
async fn emotion_detector(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Html<String> {
    let text = params
        .into_iter()
        .find(|(k, _)| k == TEXT_PARAM)
        .map(|(_, v)| v);
    Html(respond(state.detector.as_ref(), text.as_deref()).await)
}

/// Validate, detect, format. Blank or missing text never reaches `detector`.
pub async fn respond(detector: &dyn EmotionDetector, text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        counter!("emotion_requests_total", "outcome" => "invalid_input").increment(1);
        debug!("blank textToAnalyze");
        return INVALID_TEXT_MESSAGE.to_string();
    };

    match detector.analyze(text).await {
        Some(report) => {
            counter!("emotion_requests_total", "outcome" => "success").increment(1);
            format_response(&report)
        }
        None => {
            counter!("emotion_requests_total", "outcome" => "unavailable").increment(1);
            INVALID_TEXT_MESSAGE.to_string()
        }
    }
}

/// Scores are printed as the remote sent them; a missing one prints `0`.
pub fn format_response(report: &EmotionReport) -> String {
    let s = &report.scores;
    format!(
        "For the given statement, the system response is 'anger': {}, 'disgust': {}, \
         'fear': {}, 'joy': {} and 'sadness': {}. The dominant emotion is <b>{}</b>.",
        s.anger, s.disgust, s.fear, s.joy, s.sadness, report.dominant_emotion
    )
}

// src/analyze/mod.rs
//! Emotion scores and the two pure steps applied to a remote response:
//! shape normalization and dominant-emotion selection.

pub mod dominant;
pub mod normalize;

use serde::Serialize;
use serde_json::Number;
use std::fmt;

// Re-export convenient entry points.
pub use crate::analyze::dominant::dominant_emotion;
pub use crate::analyze::normalize::{normalize, NormalizeError};

/// The five emotions the remote model scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Disgust,
    Fear,
    Joy,
    Sadness,
}

impl Emotion {
    /// Canonical order. Also the tie-break order for the dominant emotion.
    pub const ALL: [Emotion; 5] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Sadness,
    ];

    /// Key used both in the remote JSON and in rendered output.
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emotion score exactly as the remote service wrote it.
///
/// Keeps the received JSON number so output shows `1`, `0.9` or `0.00001234`
/// unchanged; comparisons go through `value()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Score(Number);

impl Score {
    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(0.0)
    }
}

/// Missing keys score a plain `0`.
impl Default for Score {
    fn default() -> Self {
        Score(Number::from(0u64))
    }
}

impl From<Number> for Score {
    fn from(n: Number) -> Self {
        Score(n)
    }
}

/// Non-finite values have no JSON form and become `0`.
impl From<f64> for Score {
    fn from(v: f64) -> Self {
        Number::from_f64(v).map(Score).unwrap_or_default()
    }
}

impl PartialEq<f64> for Score {
    fn eq(&self, other: &f64) -> bool {
        self.value() == *other
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Raw confidence per emotion. No range is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionScores {
    pub anger: Score,
    pub disgust: Score,
    pub fear: Score,
    pub joy: Score,
    pub sadness: Score,
}

impl EmotionScores {
    pub fn score(&self, emotion: Emotion) -> &Score {
        match emotion {
            Emotion::Anger => &self.anger,
            Emotion::Disgust => &self.disgust,
            Emotion::Fear => &self.fear,
            Emotion::Joy => &self.joy,
            Emotion::Sadness => &self.sadness,
        }
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.score(emotion).value()
    }

    pub fn set(&mut self, emotion: Emotion, score: impl Into<Score>) {
        let slot = match emotion {
            Emotion::Anger => &mut self.anger,
            Emotion::Disgust => &mut self.disgust,
            Emotion::Fear => &mut self.fear,
            Emotion::Joy => &mut self.joy,
            Emotion::Sadness => &mut self.sadness,
        };
        *slot = score.into();
    }

    /// `(emotion, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(move |e| (e, self.get(e)))
    }
}

/// A complete result: all five scores plus the derived label.
///
/// The "unavailable" outcome is `Option::<EmotionReport>::None`, so a record
/// with only some of the six fields cannot be built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionReport {
    #[serde(flatten)]
    pub scores: EmotionScores,
    pub dominant_emotion: Emotion,
}

impl EmotionReport {
    pub fn from_scores(scores: EmotionScores) -> Self {
        Self {
            dominant_emotion: dominant_emotion(&scores),
            scores,
        }
    }
}

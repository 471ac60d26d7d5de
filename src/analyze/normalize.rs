//! Response normalization.
//!
//! The remote service has shipped several body layouts over time. Instead of
//! probing the body ad hoc, each known layout is an extraction attempt that
//! either finds the emotion object or declines; the first hit wins and the
//! whole body is the last resort.

use serde_json::{Map, Value};
use thiserror::Error;

use super::{Emotion, EmotionScores, Score};

type Object = Map<String, Value>;

/// One way of locating the emotion object inside a response body.
type Extraction = fn(&Object) -> Option<&Object>;

/// Tried in order; keep the ordering, callers rely on `emotionPredictions`
/// taking precedence over a bare `emotion` field.
const EXTRACTIONS: [(&str, Extraction); 4] = [
    ("emotionPredictions", from_emotion_predictions),
    ("emotion", from_emotion_field),
    ("predictions", from_predictions),
    ("scan", from_any_field),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("response body is not a JSON object")]
    NotAnObject,
    #[error("score for '{emotion}' is not a number")]
    NonNumeric { emotion: Emotion },
}

impl NormalizeError {
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::NotAnObject => "not_an_object",
            NormalizeError::NonNumeric { .. } => "non_numeric",
        }
    }
}

/// Reduce a parsed response body to the five emotion scores.
///
/// Missing keys count as 0. A present key holding anything other than a
/// number is an error.
pub fn normalize(body: &Value) -> Result<EmotionScores, NormalizeError> {
    let root = body.as_object().ok_or(NormalizeError::NotAnObject)?;
    read_scores(locate(root))
}

/// Resolve the emotion object, falling back to the root itself.
fn locate(root: &Object) -> &Object {
    for (name, extract) in EXTRACTIONS {
        if let Some(found) = extract(root) {
            tracing::trace!(layout = name, "emotion object located");
            return found;
        }
    }
    tracing::trace!("no known layout matched; reading scores from the root");
    root
}

fn read_scores(obj: &Object) -> Result<EmotionScores, NormalizeError> {
    let mut scores = EmotionScores::default();
    for emotion in Emotion::ALL {
        match obj.get(emotion.as_str()) {
            None => {}
            Some(Value::Number(n)) => scores.set(emotion, Score::from(n.clone())),
            Some(_) => return Err(NormalizeError::NonNumeric { emotion }),
        }
    }
    Ok(scores)
}

/// `[{"emotion": {...}}, ...]` -> the first element's emotion object.
fn first_emotion_in_list(value: &Value) -> Option<&Object> {
    value.as_array()?.first()?.as_object()?.get("emotion")?.as_object()
}

fn from_emotion_predictions(root: &Object) -> Option<&Object> {
    root.get("emotionPredictions").and_then(first_emotion_in_list)
}

fn from_emotion_field(root: &Object) -> Option<&Object> {
    root.get("emotion")?.as_object()
}

fn from_predictions(root: &Object) -> Option<&Object> {
    root.get("predictions").and_then(first_emotion_in_list)
}

/// First top-level field, in document order, that is either a list led by an
/// element with an `emotion` object or an object with an `emotion` object.
fn from_any_field(root: &Object) -> Option<&Object> {
    root.values().find_map(|value| match value {
        Value::Array(_) => first_emotion_in_list(value),
        Value::Object(inner) => from_emotion_field(inner),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_emotion_predictions_layout() {
        let body = json!({
            "emotionPredictions": [{
                "emotion": {"anger": 0.05, "disgust": 0.01, "fear": 0.02, "joy": 0.9, "sadness": 0.02}
            }]
        });
        let s = normalize(&body).unwrap();
        assert_eq!(s.anger, 0.05);
        assert_eq!(s.joy, 0.9);
        assert_eq!(s.sadness, 0.02);
    }

    #[test]
    fn emotion_predictions_wins_over_bare_emotion() {
        let body = json!({
            "emotion": {"anger": 0.8},
            "emotionPredictions": [{"emotion": {"fear": 0.7}}]
        });
        let s = normalize(&body).unwrap();
        assert_eq!(s.fear, 0.7);
        assert_eq!(s.anger, 0.0);
    }

    #[test]
    fn reads_bare_emotion_field() {
        let body = json!({"emotion": {"sadness": 0.4, "joy": 0.1}});
        let s = normalize(&body).unwrap();
        assert_eq!(s.sadness, 0.4);
        assert_eq!(s.joy, 0.1);
    }

    #[test]
    fn reads_predictions_layout() {
        let body = json!({"predictions": [{"emotion": {"disgust": 0.3}}]});
        assert_eq!(normalize(&body).unwrap().disgust, 0.3);
    }

    #[test]
    fn empty_emotion_predictions_falls_through() {
        let body = json!({
            "emotionPredictions": [],
            "predictions": [{"emotion": {"joy": 0.5}}]
        });
        assert_eq!(normalize(&body).unwrap().joy, 0.5);
    }

    #[test]
    fn scan_finds_unknown_list_field() {
        let body = json!({
            "producerId": {"name": "x"},
            "results": [{"emotion": {"fear": 0.6}}]
        });
        assert_eq!(normalize(&body).unwrap().fear, 0.6);
    }

    #[test]
    fn scan_finds_nested_object_field() {
        let body = json!({"document": {"emotion": {"anger": 0.9}}});
        assert_eq!(normalize(&body).unwrap().anger, 0.9);
    }

    #[test]
    fn scan_respects_document_order() {
        let body: Value = serde_json::from_str(
            r#"{"b": {"emotion": {"joy": 1.0}}, "a": [{"emotion": {"anger": 1.0}}]}"#,
        )
        .unwrap();
        let s = normalize(&body).unwrap();
        assert_eq!(s.joy, 1.0);
        assert_eq!(s.anger, 0.0);
    }

    #[test]
    fn flat_body_is_the_fallback() {
        let body = json!({"anger": 0.2, "joy": 0.3, "requestId": "abc"});
        let s = normalize(&body).unwrap();
        assert_eq!(s.anger, 0.2);
        assert_eq!(s.joy, 0.3);
        assert_eq!(s.fear, 0.0);
    }

    #[test]
    fn missing_keys_default_to_zero() {
        let body = json!({"emotion": {"anger": 0.1, "disgust": 0.2, "fear": 0.3, "joy": 0.4}});
        let s = normalize(&body).unwrap();
        assert_eq!(s.sadness, 0.0);
    }

    #[test]
    fn integer_scores_are_accepted() {
        let body = json!({"emotion": {"joy": 1}});
        let s = normalize(&body).unwrap();
        assert_eq!(s.joy, 1.0);
        assert_eq!(s.joy.to_string(), "1");
        assert_eq!(s.anger.to_string(), "0");
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let body = json!({"emotion": {"anger": "high"}});
        assert_eq!(
            normalize(&body),
            Err(NormalizeError::NonNumeric {
                emotion: Emotion::Anger
            })
        );
        let body = json!({"emotion": {"joy": null}});
        assert_eq!(
            normalize(&body).unwrap_err().kind(),
            "non_numeric"
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(normalize(&json!([1, 2])), Err(NormalizeError::NotAnObject));
        assert_eq!(normalize(&json!("x")), Err(NormalizeError::NotAnObject));
    }

    #[test]
    fn non_object_emotion_field_is_skipped() {
        let body = json!({"emotion": "n/a", "predictions": [{"emotion": {"fear": 0.4}}]});
        assert_eq!(normalize(&body).unwrap().fear, 0.4);
    }
}

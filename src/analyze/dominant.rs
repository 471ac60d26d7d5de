//! Dominant-emotion selection.

use super::{Emotion, EmotionScores};

/// Emotion with the highest score.
///
/// Walks `Emotion::ALL` and only replaces the current pick on a strictly
/// greater score, so ties go to the emotion listed first
/// (anger, disgust, fear, joy, sadness). All-zero scores yield anger.
pub fn dominant_emotion(scores: &EmotionScores) -> Emotion {
    let mut best = Emotion::Anger;
    let mut best_score = scores.get(best);
    for (emotion, score) in scores.iter().skip(1) {
        if score > best_score {
            best = emotion;
            best_score = score;
        }
    }
    best
}

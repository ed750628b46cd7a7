//! Keyword heuristics applied at write time: mixed-emotion detection, intent
//! detection, and the supportive reflection shown back to the writer.

use crate::journal::types::{Intent, Sentiment, NEGATIVE, POSITIVE};

/// Contrastive words that suggest the writer holds more than one feeling.
const MIXED_MARKERS: &[&str] = &["but", "however", "although", "yet"];

/// Cue words per intent, checked in this order; first hit wins.
const INTENT_CUES: &[(Intent, &[&str])] = &[
    (Intent::Venting, &["feel", "overwhelmed", "stressed"]),
    (Intent::Reaction, &["angry", "not acceptable"]),
    (Intent::Affirmation, &["amazing", "great", "nice"]),
];

const MIXED_VENTING_REFLECTION: &str =
    "You seem to be holding conflicting feelings. That\u{2019}s completely human.";
const NEGATIVE_REFLECTION: &str =
    "This sounds difficult. You don\u{2019}t need to solve it right now.";
const POSITIVE_REFLECTION: &str =
    "There\u{2019}s something positive here. Notice what led to this feeling.";
const NEUTRAL_REFLECTION: &str = "Thanks for taking a moment to write this down.";

/// Substring match, so "but" also fires inside longer words.
pub fn detect_mixed_emotion(text: &str) -> bool {
    let lower = text.to_lowercase();
    MIXED_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn detect_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    INTENT_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|c| lower.contains(c)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Reflection)
}

pub fn generate_reflection(intent: Intent, sentiment: &Sentiment) -> &'static str {
    if intent == Intent::Venting && sentiment.mixed {
        return MIXED_VENTING_REFLECTION;
    }
    match sentiment.label.as_str() {
        NEGATIVE => NEGATIVE_REFLECTION,
        POSITIVE => POSITIVE_REFLECTION,
        _ => NEUTRAL_REFLECTION,
    }
}

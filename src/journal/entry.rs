//! Turn raw text plus a sentiment prediction into a new [`JournalRecord`].

use chrono::{DateTime, SecondsFormat, Utc};

use crate::journal::heuristics::{detect_intent, detect_mixed_emotion, generate_reflection};
use crate::journal::types::{JournalRecord, Sentiment};
use crate::sentiment::SentimentScore;

/// Build the record for `text` as of `now`. The id is a UUID v7.
pub fn compose_record(text: &str, prediction: SentimentScore, now: DateTime<Utc>) -> JournalRecord {
    let sentiment = Sentiment {
        label: prediction.label,
        score: prediction.score,
        mixed: detect_mixed_emotion(text),
    };
    let intent = detect_intent(text);
    let reflection = generate_reflection(intent, &sentiment);

    JournalRecord {
        id: uuid::Uuid::now_v7().to_string(),
        kind: "text".into(),
        content: text.to_string(),
        sentiment,
        intent: Some(intent.to_string()),
        reflection: Some(reflection.to_string()),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}

//! Weekly emotional profile.
//!
//! [`build_weekly_profile`] turns a snapshot of journal records into a summary of
//! the trailing window: how positive or negative the entries were, how often the
//! mood flipped between consecutive entries, which intents dominated, and a
//! confidence score blending volume, time coverage, and label diversity.
//!
//! The builder is a pure function. Records with unparseable timestamps are
//! skipped, a window with too few entries yields [`WeeklyProfile::InsufficientData`],
//! and nothing here ever returns an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::config::ProfileConfig;
use crate::journal::store::JournalRecordSource;
use crate::journal::types::{JournalRecord, NEGATIVE, POSITIVE};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
/// Fewer qualifying entries than this and no profile is built.
pub const MIN_PROFILE_ENTRIES: usize = 5;
/// Volatility ratios from here up to [`HIGH_VOLATILITY`] are "moderate".
pub const MODERATE_VOLATILITY: f64 = 0.3;
pub const HIGH_VOLATILITY: f64 = 0.6;
/// Entry count at which the volume score saturates at 1.0.
pub const VOLUME_SATURATION: f64 = 10.0;
pub const WEIGHT_VOLUME: f64 = 0.4;
pub const WEIGHT_SPAN: f64 = 0.3;
pub const WEIGHT_DIVERSITY: f64 = 0.3;
/// Expected number of distinct labels (POSITIVE / NEGATIVE).
pub const DIVERSITY_DENOMINATOR: f64 = 2.0;
pub const MAX_DOMINANT_INTENTS: usize = 2;
/// Day span used when the window endpoints cannot be parsed.
pub const FALLBACK_DAYS_SPAN: i64 = 1;
/// Intent counted for records that carry none.
pub const UNKNOWN_INTENT: &str = "unknown";
pub const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough entries to build a reliable profile.";

const MICROS_PER_DAY: i64 = 86_400_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Naive layouts accepted after RFC 3339. Naive values are read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts RFC 3339 rejects: no seconds, or a space separator.
const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Hour-only values are matched after appending ":00".
const HOUR_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

// ── Public types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("unparseable timestamp: {0:?}")]
    Unparseable(String),
}

/// Result of a profile build: either too little data, or a computed summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeeklyProfile {
    InsufficientData(InsufficientData),
    Computed(ProfileSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsufficientData {
    pub status: ProfileStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    /// `last_<days>_days`
    pub period: String,
    pub emotional_stability: EmotionalStability,
    pub dominant_intents: Vec<String>,
    pub entry_count: usize,
    /// Rounded to two decimals. Nominally in `[0.0, 1.0]` but not clamped.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionalStability {
    pub positive: f64,
    pub negative: f64,
    pub volatility: Volatility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    Low,
    Moderate,
    High,
}

impl WeeklyProfile {
    fn insufficient() -> Self {
        Self::InsufficientData(InsufficientData {
            status: ProfileStatus::InsufficientData,
            message: INSUFFICIENT_DATA_MESSAGE.to_string(),
        })
    }

    pub fn summary(&self) -> Option<&ProfileSummary> {
        match self {
            Self::Computed(summary) => Some(summary),
            Self::InsufficientData(_) => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Fetch a snapshot from `source` and build the profile for the trailing window.
pub fn weekly_profile<S>(
    source: &S,
    window_days: u32,
    config: &ProfileConfig,
) -> anyhow::Result<WeeklyProfile>
where
    S: JournalRecordSource + ?Sized,
{
    let records = source.fetch_all()?;
    Ok(build_weekly_profile(&records, window_days, config))
}

/// Build the profile for the `window_days` ending now.
pub fn build_weekly_profile(
    records: &[JournalRecord],
    window_days: u32,
    config: &ProfileConfig,
) -> WeeklyProfile {
    build_weekly_profile_at(records, window_days, config, Utc::now())
}

/// Build the profile for the `window_days` ending at `now`.
pub fn build_weekly_profile_at(
    records: &[JournalRecord],
    window_days: u32,
    config: &ProfileConfig,
    now: DateTime<Utc>,
) -> WeeklyProfile {
    // 1. Recency filter (unparseable timestamps are skipped)
    let mut recent = recent_window(records, window_days, now);

    // 2. Minimum-data guard
    if recent.len() < config.min_entries.max(1) {
        return WeeklyProfile::insufficient();
    }

    if config.chronological {
        recent.sort_by_key(|(_, at)| *at);
    }
    let recent: Vec<&JournalRecord> = recent.into_iter().map(|(record, _)| record).collect();

    // 3. Emotional stability
    let labels: Vec<&str> = recent.iter().map(|r| r.sentiment.label.as_str()).collect();
    let total = labels.len() as f64;
    let share = |wanted: &str| labels.iter().filter(|l| **l == wanted).count() as f64 / total;

    // 4. Volatility
    let switches = labels.windows(2).filter(|pair| pair[0] != pair[1]).count();
    let volatility = classify_volatility(switches as f64 / total, config);

    // 5. Dominant intents
    let dominant_intents = dominant_intents(&recent, config.max_intents);

    // 6. Confidence
    let span_days = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) => days_span(first, last),
        _ => FALLBACK_DAYS_SPAN,
    };
    let distinct_labels = labels.iter().collect::<HashSet<_>>().len();

    let volume_score = (recent.len() as f64 / config.volume_saturation).min(1.0);
    let span_score = (span_days as f64 / f64::from(window_days.max(1))).min(1.0);
    let mut diversity_score = distinct_labels as f64 / config.diversity_denominator;
    if config.clamp_diversity {
        diversity_score = diversity_score.min(1.0);
    }

    tracing::debug!(
        entries = recent.len(),
        switches,
        span_days,
        distinct_labels,
        "weekly profile computed"
    );

    WeeklyProfile::Computed(ProfileSummary {
        period: format!("last_{window_days}_days"),
        emotional_stability: EmotionalStability {
            positive: share(POSITIVE),
            negative: share(NEGATIVE),
            volatility,
        },
        dominant_intents,
        entry_count: recent.len(),
        confidence: confidence_score(volume_score, span_score, diversity_score, config),
    })
}

/// Parse an ISO 8601 date-time. Offsets are converted to UTC; naive values and
/// bare dates are taken to be UTC already.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(raw, layout) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(naive.and_utc());
        }
    }
    let padded = format!("{raw}:00");
    for layout in HOUR_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&padded, layout) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError::Unparseable(raw.to_string()))
}

/// Weighted blend of the three scores, rounded to two decimals.
///
/// Rounding goes through the decimal expansion of the exact binary value, so a
/// blend that prints as 0.725 but is stored as 0.72499... rounds down.
pub fn confidence_score(
    volume_score: f64,
    span_score: f64,
    diversity_score: f64,
    config: &ProfileConfig,
) -> f64 {
    let raw = config.weight_volume * volume_score
        + config.weight_span * span_score
        + config.weight_diversity * diversity_score;
    format!("{raw:.2}").parse().unwrap_or(raw)
}

pub fn classify_volatility(ratio: f64, config: &ProfileConfig) -> Volatility {
    if ratio < config.moderate_volatility {
        Volatility::Low
    } else if ratio < config.high_volatility {
        Volatility::Moderate
    } else {
        Volatility::High
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Records at or after `now - window_days`, in input order, paired with their
/// parsed timestamps.
fn recent_window(
    records: &[JournalRecord],
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<(&JournalRecord, DateTime<Utc>)> {
    let cutoff = now
        .checked_sub_signed(TimeDelta::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut skipped = 0usize;
    let recent: Vec<_> = records
        .iter()
        .filter_map(|record| match parse_timestamp(&record.timestamp) {
            Ok(at) => Some((record, at)),
            Err(e) => {
                tracing::trace!(id = %record.id, error = %e, "skipping record");
                skipped += 1;
                None
            }
        })
        .filter(|(_, at)| *at >= cutoff)
        .collect();

    tracing::debug!(
        window_days,
        considered = records.len(),
        recent = recent.len(),
        skipped,
        "filtered journal window"
    );
    recent
}

/// Top `limit` intents by frequency; ties keep first-seen order.
fn dominant_intents(recent: &[&JournalRecord], limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in recent {
        let intent = record.intent.as_deref().unwrap_or(UNKNOWN_INTENT);
        match slots.get(intent) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(intent, counts.len());
                counts.push((intent, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(intent, _)| intent.to_string())
        .collect()
}

/// Whole days between the window endpoints, plus one. Positional endpoints,
/// not min/max, unless the caller sorted first.
fn days_span(first: &JournalRecord, last: &JournalRecord) -> i64 {
    match (
        parse_timestamp(&first.timestamp),
        parse_timestamp(&last.timestamp),
    ) {
        (Ok(start), Ok(end)) => floor_days(end - start) + 1,
        _ => FALLBACK_DAYS_SPAN,
    }
}

/// Day count of a signed duration, rounded toward negative infinity.
fn floor_days(delta: TimeDelta) -> i64 {
    match delta.num_microseconds() {
        Some(micros) => micros.div_euclid(MICROS_PER_DAY),
        None => delta.num_seconds().div_euclid(SECONDS_PER_DAY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::Sentiment;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn hours_ago(h: i64) -> String {
        (now() - TimeDelta::hours(h)).to_rfc3339()
    }

    fn record(label: &str, intent: Option<&str>, timestamp: &str) -> JournalRecord {
        JournalRecord {
            id: uuid::Uuid::now_v7().to_string(),
            kind: "text".into(),
            content: "entry".into(),
            sentiment: Sentiment {
                label: label.into(),
                score: 0.9,
                mixed: false,
            },
            intent: intent.map(str::to_string),
            reflection: None,
            timestamp: timestamp.into(),
        }
    }

    fn labelled(labels: &[&str]) -> Vec<JournalRecord> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let age = (labels.len() - i) as i64;
                record(l, Some("reflection"), &hours_ago(age))
            })
            .collect()
    }

    fn build(records: &[JournalRecord]) -> WeeklyProfile {
        build_weekly_profile_at(records, 7, &ProfileConfig::default(), now())
    }

    fn computed(records: &[JournalRecord]) -> ProfileSummary {
        build(records)
            .summary()
            .cloned()
            .expect("expected a computed profile")
    }

    #[test]
    fn threshold_boundary_is_five_entries() {
        let four = labelled(&[POSITIVE; 4]);
        assert!(matches!(build(&four), WeeklyProfile::InsufficientData(_)));

        let five = labelled(&[POSITIVE; 5]);
        assert_eq!(computed(&five).entry_count, 5);
    }

    #[test]
    fn entries_outside_window_do_not_count() {
        let mut records = labelled(&[POSITIVE; 4]);
        records.push(record(POSITIVE, None, &hours_ago(7 * 24 + 1)));
        assert!(build(&records).summary().is_none());

        // exactly on the cutoff still qualifies
        records.push(record(POSITIVE, None, &hours_ago(7 * 24)));
        assert_eq!(computed(&records).entry_count, 5);
    }

    #[test]
    fn malformed_timestamp_is_dropped() {
        let mut records = labelled(&[POSITIVE, NEGATIVE, POSITIVE, NEGATIVE, POSITIVE]);
        records.insert(2, record(NEGATIVE, Some("venting"), "not-a-date"));

        let summary = computed(&records);
        assert_eq!(summary.entry_count, 5);
        assert_eq!(summary.dominant_intents, vec!["reflection"]);
        assert!((summary.emotional_stability.positive - 0.6).abs() < 1e-9);

        records.truncate(4);
        assert!(build(&records).summary().is_none());
    }

    #[test]
    fn ratios_sum_to_one_for_binary_labels() {
        let summary = computed(&labelled(&[POSITIVE, NEGATIVE, NEGATIVE, POSITIVE, NEGATIVE]));
        let s = &summary.emotional_stability;
        assert!((0.0..=1.0).contains(&s.positive));
        assert!((0.0..=1.0).contains(&s.negative));
        assert!((s.positive + s.negative - 1.0).abs() < 1e-9);
    }

    #[test]
    fn other_labels_count_toward_total_only() {
        let summary = computed(&labelled(&[POSITIVE, "NEUTRAL", NEGATIVE, "NEUTRAL", POSITIVE]));
        assert!((summary.emotional_stability.positive - 0.4).abs() < 1e-9);
        assert!((summary.emotional_stability.negative - 0.2).abs() < 1e-9);
    }

    #[test]
    fn two_switches_in_five_is_moderate() {
        let summary = computed(&labelled(&[POSITIVE, POSITIVE, NEGATIVE, NEGATIVE, POSITIVE]));
        assert_eq!(summary.emotional_stability.volatility, Volatility::Moderate);
    }

    #[test]
    fn volatility_breakpoints() {
        let config = ProfileConfig::default();
        assert_eq!(classify_volatility(0.0, &config), Volatility::Low);
        assert_eq!(classify_volatility(0.29, &config), Volatility::Low);
        assert_eq!(classify_volatility(0.3, &config), Volatility::Moderate);
        assert_eq!(classify_volatility(0.59, &config), Volatility::Moderate);
        assert_eq!(classify_volatility(0.6, &config), Volatility::High);
        assert_eq!(classify_volatility(0.8, &config), Volatility::High);
    }

    #[test]
    fn dominant_intents_break_ties_by_first_seen() {
        let intents = ["venting", "venting", "reflection", "affirmation", "venting"];
        let records: Vec<_> = intents
            .iter()
            .enumerate()
            .map(|(i, intent)| record(POSITIVE, Some(*intent), &hours_ago(5 - i as i64)))
            .collect();

        assert_eq!(computed(&records).dominant_intents, vec!["venting", "reflection"]);
    }

    #[test]
    fn missing_intent_counts_as_unknown() {
        let records: Vec<_> = (0..5)
            .map(|i| {
                let intent = if i < 3 { None } else { Some("venting") };
                record(POSITIVE, intent, &hours_ago(i + 1))
            })
            .collect();
        assert_eq!(computed(&records).dominant_intents, vec!["unknown", "venting"]);
    }

    #[test]
    fn confidence_rounds_weighted_blend() {
        let config = ProfileConfig::default();
        assert_eq!(confidence_score(0.5, 1.0, 1.0, &config), 0.8);
        assert_eq!(confidence_score(0.6, 3.0 / 7.0, 1.0, &config), 0.67);
        assert_eq!(confidence_score(0.0, 0.0, 0.0, &config), 0.0);
        // 0.725 is stored just below the tie; scaling by 100 first would give 0.73
        assert_eq!(confidence_score(0.5, 0.75, 1.0, &config), 0.72);
    }

    fn build_over(records: &[JournalRecord], window_days: u32) -> WeeklyProfile {
        build_weekly_profile_at(records, window_days, &ProfileConfig::default(), now())
    }

    fn at_hours(labels: &[&str], hours: &[i64]) -> Vec<JournalRecord> {
        labels
            .iter()
            .zip(hours)
            .map(|(l, &h)| record(l, Some("reflection"), &hours_ago(h)))
            .collect()
    }

    #[test]
    fn four_day_window_two_days_apart_scores_point_seven_two() {
        // endpoints exactly 48 hours apart: span 3 of 4
        let records = at_hours(
            &[POSITIVE, NEGATIVE, POSITIVE, NEGATIVE, POSITIVE],
            &[60, 50, 40, 20, 12],
        );
        let profile = build_over(&records, 4);
        let summary = profile.summary().expect("expected a computed profile");

        assert_eq!(summary.period, "last_4_days");
        assert_eq!(summary.entry_count, 5);
        // 0.4 * 0.5 + 0.3 * 0.75 + 0.3 * 1.0
        assert_eq!(summary.confidence, 0.72);
    }

    #[test]
    fn four_day_cutoff_is_inclusive() {
        let mut records = at_hours(&[POSITIVE; 4], &[40, 30, 20, 10]);
        records.insert(0, record(NEGATIVE, None, &hours_ago(4 * 24 + 1)));
        assert!(build_over(&records, 4).summary().is_none());

        records.insert(1, record(NEGATIVE, None, &hours_ago(4 * 24)));
        let profile = build_over(&records, 4);
        let summary = profile.summary().expect("expected a computed profile");
        assert_eq!(summary.entry_count, 5);
        assert_eq!(summary.emotional_stability.negative, 0.2);
    }

    #[test]
    fn one_day_window() {
        let records = at_hours(&[POSITIVE; 5], &[20, 15, 10, 5, 1]);
        let profile = build_over(&records, 1);
        let summary = profile.summary().expect("expected a computed profile");

        assert_eq!(summary.period, "last_1_days");
        // same-day endpoints: span 1 of 1, a single label
        // 0.4 * 0.5 + 0.3 * 1.0 + 0.3 * 0.5
        assert_eq!(summary.confidence, 0.65);

        let mut stale = at_hours(&[POSITIVE; 4], &[20, 15, 10, 5]);
        stale.insert(0, record(POSITIVE, None, &hours_ago(25)));
        assert!(build_over(&stale, 1).summary().is_none());
        stale.insert(1, record(POSITIVE, None, &hours_ago(24)));
        assert_eq!(build_over(&stale, 1).summary().map(|s| s.entry_count), Some(5));
    }

    #[test]
    fn thirty_day_window() {
        // endpoints 216 hours apart: span 10 of 30
        let records = at_hours(
            &[POSITIVE, NEGATIVE, POSITIVE, NEGATIVE, POSITIVE],
            &[217, 150, 100, 50, 1],
        );
        let profile = build_over(&records, 30);
        let summary = profile.summary().expect("expected a computed profile");

        assert_eq!(summary.period, "last_30_days");
        assert_eq!(summary.entry_count, 5);
        // 0.4 * 0.5 + 0.3 * (10 / 30) + 0.3 * 1.0
        assert_eq!(summary.confidence, 0.6);

        let mut with_stale = records.clone();
        with_stale.insert(0, record(NEGATIVE, None, &hours_ago(30 * 24 + 1)));
        let profile = build_over(&with_stale, 30);
        assert_eq!(profile.summary().map(|s| s.entry_count), Some(5));
        // a 7-day window over the same records drops the first two
        assert!(build_over(&records, 7).summary().is_none());
    }

    #[test]
    fn full_week_of_five_entries_scores_point_eight() {
        // endpoints 155 hours apart: 6 whole days, span 7 of 7
        let records = vec![
            record(POSITIVE, None, &hours_ago(156)),
            record(NEGATIVE, None, &hours_ago(100)),
            record(POSITIVE, None, &hours_ago(50)),
            record(NEGATIVE, None, &hours_ago(10)),
            record(POSITIVE, None, &hours_ago(1)),
        ];
        assert_eq!(computed(&records).confidence, 0.8);
    }

    #[test]
    fn end_to_end_three_day_window() {
        let labels = [POSITIVE, POSITIVE, NEGATIVE, POSITIVE, NEGATIVE, NEGATIVE];
        let hours = [60, 50, 40, 30, 20, 10];
        let records: Vec<_> = labels
            .iter()
            .zip(hours)
            .map(|(l, h)| record(l, Some("reflection"), &hours_ago(h)))
            .collect();

        let summary = computed(&records);
        assert_eq!(summary.period, "last_7_days");
        assert_eq!(summary.entry_count, 6);
        assert_eq!(summary.dominant_intents, vec!["reflection"]);
        assert_eq!(summary.emotional_stability.positive, 0.5);
        assert_eq!(summary.emotional_stability.negative, 0.5);
        // P→N, N→P, P→N: three changes in six entries
        assert_eq!(summary.emotional_stability.volatility, Volatility::Moderate);
        // 0.4 * 0.6 + 0.3 * 3/7 + 0.3 * 1.0
        assert_eq!(summary.confidence, 0.67);
    }

    #[test]
    fn four_changes_in_six_is_high() {
        let summary = computed(&labelled(&[
            POSITIVE, NEGATIVE, POSITIVE, NEGATIVE, NEGATIVE, POSITIVE,
        ]));
        assert_eq!(summary.emotional_stability.volatility, Volatility::High);
    }

    #[test]
    fn build_is_deterministic_and_leaves_input_alone() {
        let records = labelled(&[POSITIVE, NEGATIVE, POSITIVE, POSITIVE, NEGATIVE, POSITIVE]);
        let before = records.clone();
        let first = build(&records);
        let second = build(&records);
        assert_eq!(first, second);
        assert_eq!(records, before);
    }

    #[test]
    fn store_order_drives_volatility_unless_chronological() {
        // store order P N P N P, chronological order P P P N N
        let records = vec![
            record(POSITIVE, None, &hours_ago(5)),
            record(NEGATIVE, None, &hours_ago(2)),
            record(POSITIVE, None, &hours_ago(4)),
            record(NEGATIVE, None, &hours_ago(1)),
            record(POSITIVE, None, &hours_ago(3)),
        ];
        assert_eq!(computed(&records).emotional_stability.volatility, Volatility::High);

        let config = ProfileConfig {
            chronological: true,
            ..ProfileConfig::default()
        };
        let sorted = build_weekly_profile_at(&records, 7, &config, now());
        assert_eq!(
            sorted.summary().unwrap().emotional_stability.volatility,
            Volatility::Low
        );
    }

    #[test]
    fn third_label_inflates_diversity_unless_clamped() {
        // all within one day: volume 0.5, span 1/7
        let records = labelled(&[POSITIVE, NEGATIVE, "NEUTRAL", POSITIVE, NEGATIVE]);
        assert_eq!(computed(&records).confidence, 0.69);

        let config = ProfileConfig {
            clamp_diversity: true,
            ..ProfileConfig::default()
        };
        let clamped = build_weekly_profile_at(&records, 7, &config, now());
        assert_eq!(clamped.summary().unwrap().confidence, 0.54);
    }

    #[test]
    fn reversed_endpoints_give_negative_span() {
        assert_eq!(floor_days(TimeDelta::hours(-36)), -2);
        assert_eq!(floor_days(TimeDelta::hours(36)), 1);
        assert_eq!(floor_days(TimeDelta::zero()), 0);

        let first = record(POSITIVE, None, &hours_ago(1));
        let last = record(POSITIVE, None, &hours_ago(37));
        assert_eq!(days_span(&first, &last), -1);
    }

    #[test]
    fn unparseable_endpoint_falls_back_to_one_day() {
        let good = record(POSITIVE, None, &hours_ago(1));
        let bad = record(POSITIVE, None, "yesterday-ish");
        assert_eq!(days_span(&good, &bad), FALLBACK_DAYS_SPAN);
    }

    #[test]
    fn parse_timestamp_accepts_iso_variants() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-10-18T09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18T09:30:00.000000").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18 09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18T09:30").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18T11:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18T11:30+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18 07:30-02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-18 11:30:00.000+02:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2026-10-18T09").unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2026-10-18").unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("not-a-date"),
            Err(TimestampError::Unparseable("not-a-date".into()))
        );
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn serializes_both_shapes() {
        let insufficient = serde_json::to_value(build(&[])).unwrap();
        assert_eq!(
            insufficient,
            serde_json::json!({
                "status": "insufficient_data",
                "message": "Not enough entries to build a reliable profile."
            })
        );

        let summary = serde_json::to_value(build(&labelled(&[POSITIVE; 5]))).unwrap();
        assert_eq!(summary["period"], "last_7_days");
        assert_eq!(summary["emotional_stability"]["volatility"], "low");
        assert_eq!(summary["emotional_stability"]["positive"], 1.0);
        assert_eq!(summary["entry_count"], 5);
        assert!(summary.get("status").is_none());
    }

    #[test]
    fn weekly_profile_reads_from_source() {
        let records: Vec<_> = (1..=6)
            .map(|h| {
                let at = Utc::now() - TimeDelta::hours(h);
                record(POSITIVE, None, &at.to_rfc3339())
            })
            .collect();
        let profile = weekly_profile(records.as_slice(), 7, &ProfileConfig::default()).unwrap();
        assert_eq!(profile.summary().unwrap().entry_count, 6);
    }
}

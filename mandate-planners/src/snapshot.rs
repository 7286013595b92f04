//! Last-evaluation snapshots and their retrieval seam.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary block of a stored evaluation document.
///
/// Fields are deliberately loose: snapshots come from external persistence
/// and may predate the current schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// Verdict string as stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    /// Evaluation timestamp, when the writer put it inside the summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<String>,
}

/// The last stored evaluation for a system, as retrieved from persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationSnapshot {
    /// Summary block, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SnapshotSummary>,
    /// Top-level timestamp, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Alternative top-level timestamp key used by some writers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<String>,
}

impl EvaluationSnapshot {
    /// Returns the stored verdict lowercased, or `"unknown"` when absent.
    #[must_use]
    pub fn verdict_lowercase(&self) -> String {
        self.summary
            .as_ref()
            .and_then(|summary| summary.verdict.as_deref())
            .map_or_else(|| "unknown".to_owned(), str::to_lowercase)
    }

    /// Returns the raw timestamp string, trying `timestamp`, then
    /// `evaluated_at`, then the summary's `evaluated_at`.
    #[must_use]
    pub fn timestamp_raw(&self) -> Option<&str> {
        self.timestamp
            .as_deref()
            .or(self.evaluated_at.as_deref())
            .or_else(|| {
                self.summary
                    .as_ref()
                    .and_then(|summary| summary.evaluated_at.as_deref())
            })
    }

    /// Returns the parsed evaluation timestamp, when one can be recognized.
    #[must_use]
    pub fn evaluated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp_raw().and_then(parse_timestamp)
    }
}

/// Parses an ISO-8601 timestamp, accepting `Z`-suffixed, offset-qualified,
/// and naive (assumed UTC) forms.
///
/// Unparsable input yields `None`; parsing never errors.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Retrieves the last stored evaluation for a system.
///
/// Implementations typically wrap blocking persistence calls (document
/// stores, blob storage). A source that cannot produce a snapshot, whether
/// because none exists or because retrieval failed, returns `None`; the planner
/// treats both identically as "no previous evaluation". Retries and backoff
/// belong in the implementation, not in the planner.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Returns the last evaluation stored for `system_id`, or `None`.
    async fn last_evaluation(&self, system_id: &str) -> Option<EvaluationSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_utc_suffixed_and_offset_forms() {
        let zulu = parse_timestamp("2026-08-01T10:00:00Z").expect("zulu");
        let offset = parse_timestamp("2026-08-01T12:00:00+02:00").expect("offset");
        assert_eq!(zulu, offset);
    }

    #[test]
    fn accepts_naive_timestamps_as_utc() {
        let naive = parse_timestamp("2026-08-01T10:00:00").expect("naive");
        let zulu = parse_timestamp("2026-08-01T10:00:00Z").expect("zulu");
        assert_eq!(naive, zulu);
    }

    #[test]
    fn unparsable_input_degrades_to_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("2026-13-99").is_none());
    }

    #[test]
    fn timestamp_lookup_order_prefers_top_level_keys() {
        let snapshot = EvaluationSnapshot {
            summary: Some(SnapshotSummary {
                verdict: Some("PASS".into()),
                evaluated_at: Some("2026-01-01T00:00:00Z".into()),
            }),
            timestamp: Some("2026-03-01T00:00:00Z".into()),
            evaluated_at: Some("2026-02-01T00:00:00Z".into()),
        };
        assert_eq!(snapshot.timestamp_raw(), Some("2026-03-01T00:00:00Z"));
        assert_eq!(snapshot.verdict_lowercase(), "pass");

        let fallback = EvaluationSnapshot {
            summary: Some(SnapshotSummary {
                verdict: None,
                evaluated_at: Some("2026-01-01T00:00:00Z".into()),
            }),
            ..EvaluationSnapshot::default()
        };
        assert_eq!(fallback.timestamp_raw(), Some("2026-01-01T00:00:00Z"));
        assert_eq!(fallback.verdict_lowercase(), "unknown");
    }
}

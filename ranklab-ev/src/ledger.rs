//! Submission ledger
//!
//! Orchestrates one evaluation request end to end: configuration and quota
//! gates, normalization, comparison, metrics, attempt numbering, preview
//! selection, and the single persisting insert.
//!
//! The count-read / attempt-assign / insert sequence for one participant
//! runs under that participant's evaluation lock, so attempt numbers are
//! unique and gap-free and the quota is a hard cap even under concurrent
//! double-submits. A UNIQUE(participant_id, attempt_number) constraint
//! backstops the invariant at the storage layer.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use ranklab_common::db::{self, SubmissionRow};
use ranklab_common::{Error, Result};

use crate::eval::{compare, compute_metrics, normalize_rows, RawRow, RowVerdict};
use crate::AppState;

/// Mismatching rows shown first in the preview
const PREVIEW_MISMATCH_LIMIT: usize = 15;
/// Matching rows appended after the mismatches
const PREVIEW_MATCH_LIMIT: usize = 5;
/// Upper bound on total preview length
const PREVIEW_TOTAL_LIMIT: usize = 20;

/// A completed evaluation: the persisted record plus its preview rows
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub submission: SubmissionRow,
    pub preview: Vec<RowVerdict>,
}

/// Evaluate one submission and persist the result
///
/// Fails without persisting anything on NotConfigured, QuotaExceeded,
/// EmptyInput, or NoOverlap. The answer-key snapshot is taken up front, so
/// a concurrent key replacement does not affect this evaluation.
pub async fn evaluate_submission(
    state: &AppState,
    participant_id: &str,
    raw_rows: &[RawRow],
) -> Result<EvaluationOutcome> {
    // Gate 1: an active answer key must exist before any other work
    let key = state.answer_key.snapshot().ok_or(Error::NotConfigured)?;

    let lock = state.participant_lock(participant_id);
    let _guard = lock.lock().await;

    // Gate 2: effective quota vs. current submission count
    let quota_override: Option<Option<i64>> =
        sqlx::query_scalar("SELECT quota_override FROM participants WHERE guid = ?")
            .bind(participant_id)
            .fetch_optional(&state.db)
            .await?;

    let quota_override = quota_override
        .ok_or_else(|| Error::NotFound(format!("Unknown participant: {}", participant_id)))?;

    let quota = match quota_override {
        Some(value) => value,
        None => db::default_submission_quota(&state.db).await?,
    };

    let used: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE participant_id = ?")
            .bind(participant_id)
            .fetch_one(&state.db)
            .await?;

    if used >= quota {
        return Err(Error::QuotaExceeded {
            used,
            allowed: quota,
        });
    }

    // Gate 3: normalization must leave at least one usable row
    let records = normalize_rows(raw_rows);
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    // Gate 4: metrics are undefined on an empty join
    let comparison = compare(&records, &key.records);
    if comparison.rows_compared() == 0 {
        return Err(Error::NoOverlap);
    }

    let metrics = compute_metrics(&comparison.verdicts);
    let preview = build_preview(&comparison.verdicts);

    let attempt_number = used + 1;
    let guid = Uuid::new_v4().to_string();
    let submitted_at = Utc::now();
    let preview_json = serde_json::to_string(&preview)
        .map_err(|e| Error::Internal(format!("Failed to serialize preview: {}", e)))?;

    let submission = SubmissionRow {
        guid,
        participant_id: participant_id.to_string(),
        attempt_number,
        submitted_at,
        rows_in_canonical: key.records.len() as i64,
        rows_in_submission: records.len() as i64,
        rows_compared: comparison.rows_compared() as i64,
        missing_rows: comparison.missing_rows as i64,
        extra_rows: comparison.extra_rows as i64,
        matches: metrics.matches as i64,
        accuracy: metrics.accuracy,
        precision: metrics.precision,
        recall: metrics.recall,
        f1: metrics.f1,
        preview: preview_json,
    };

    // Single atomic write; the evaluation is complete only once this lands
    sqlx::query(
        r#"
        INSERT INTO submissions (
            guid, participant_id, attempt_number, submitted_at,
            rows_in_canonical, rows_in_submission, rows_compared,
            missing_rows, extra_rows, matches,
            accuracy, precision, recall, f1, preview
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&submission.guid)
    .bind(&submission.participant_id)
    .bind(submission.attempt_number)
    .bind(submission.submitted_at)
    .bind(submission.rows_in_canonical)
    .bind(submission.rows_in_submission)
    .bind(submission.rows_compared)
    .bind(submission.missing_rows)
    .bind(submission.extra_rows)
    .bind(submission.matches)
    .bind(submission.accuracy)
    .bind(submission.precision)
    .bind(submission.recall)
    .bind(submission.f1)
    .bind(&submission.preview)
    .execute(&state.db)
    .await?;

    info!(
        participant = participant_id,
        attempt = attempt_number,
        accuracy = metrics.accuracy,
        f1 = metrics.f1,
        "Submission evaluated"
    );
    debug!(
        compared = comparison.rows_compared(),
        missing = comparison.missing_rows,
        extra = comparison.extra_rows,
        "Row counts"
    );

    Ok(EvaluationOutcome {
        submission,
        preview,
    })
}

/// Select the bounded preview: mismatches first, then matches, both in
/// comparison order
fn build_preview(verdicts: &[RowVerdict]) -> Vec<RowVerdict> {
    let mut preview: Vec<RowVerdict> = verdicts
        .iter()
        .filter(|v| !v.matched)
        .take(PREVIEW_MISMATCH_LIMIT)
        .cloned()
        .collect();

    preview.extend(
        verdicts
            .iter()
            .filter(|v| v.matched)
            .take(PREVIEW_MATCH_LIMIT)
            .cloned(),
    );

    preview.truncate(PREVIEW_TOTAL_LIMIT);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(row_id: &str, matched: bool) -> RowVerdict {
        RowVerdict {
            row_id: row_id.to_string(),
            predicted: if matched { "A" } else { "B" }.to_string(),
            actual: "A".to_string(),
            matched,
        }
    }

    #[test]
    fn preview_prioritizes_mismatches() {
        let mut verdicts = Vec::new();
        for i in 0..30 {
            verdicts.push(verdict(&format!("m{}", i), false));
        }
        for i in 0..10 {
            verdicts.push(verdict(&format!("ok{}", i), true));
        }

        let preview = build_preview(&verdicts);
        assert_eq!(preview.len(), 20);
        assert_eq!(preview.iter().filter(|v| !v.matched).count(), 15);
        assert_eq!(preview.iter().filter(|v| v.matched).count(), 5);
        // Comparison order preserved within each group
        assert_eq!(preview[0].row_id, "m0");
        assert_eq!(preview[14].row_id, "m14");
        assert_eq!(preview[15].row_id, "ok0");
    }

    #[test]
    fn preview_of_all_matches_is_bounded_by_match_limit() {
        let verdicts: Vec<RowVerdict> = (0..10).map(|i| verdict(&i.to_string(), true)).collect();
        let preview = build_preview(&verdicts);
        assert_eq!(preview.len(), 5);
        assert!(preview.iter().all(|v| v.matched));
    }

    #[test]
    fn preview_shorter_than_limits_keeps_everything() {
        let verdicts = vec![verdict("1", false), verdict("2", true)];
        let preview = build_preview(&verdicts);
        assert_eq!(preview.len(), 2);
        assert!(!preview[0].matched);
        assert!(preview[1].matched);
    }
}

//! Leaderboard aggregation
//!
//! Reduces every participant's submission history to their single best
//! submission, then ranks participants. Recomputed from persisted data on
//! every request; there is no cached rank state to go stale.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use ranklab_common::Result;

/// One ranked participant with their best submission
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub participant_id: String,
    pub display_name: String,
    pub accuracy: f64,
    pub f1: f64,
    pub attempt_number: i64,
    pub submitted_at: DateTime<Utc>,
    pub total_attempts: i64,
}

/// Result of a "my rank" lookup
///
/// `rank` is None when the participant has no submissions; that is an
/// explicit absent-rank result, not rank 0 and not an error.
#[derive(Debug, Clone, Serialize)]
pub struct RankLookup {
    pub rank: Option<i64>,
    pub total_participants: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ScoredRow {
    participant_id: String,
    display_name: String,
    attempt_number: i64,
    submitted_at: DateTime<Utc>,
    accuracy: f64,
    f1: f64,
}

/// Within one participant's history: accuracy desc, f1 desc, then the
/// earliest attempt wins the tie
fn best_submission_order(a: &ScoredRow, b: &ScoredRow) -> Ordering {
    b.accuracy
        .total_cmp(&a.accuracy)
        .then(b.f1.total_cmp(&a.f1))
        .then(a.attempt_number.cmp(&b.attempt_number))
}

/// Across participants: accuracy desc, f1 desc, earlier submission first,
/// with attempt number as the final tiebreak so the order is total
fn ranking_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.accuracy
        .total_cmp(&a.accuracy)
        .then(b.f1.total_cmp(&a.f1))
        .then(a.submitted_at.cmp(&b.submitted_at))
        .then(a.attempt_number.cmp(&b.attempt_number))
}

/// Compute the full ranking from current persisted submissions
pub async fn compute_leaderboard(pool: &SqlitePool) -> Result<Vec<LeaderboardEntry>> {
    let rows: Vec<ScoredRow> = sqlx::query_as(
        r#"
        SELECT s.participant_id, p.display_name, s.attempt_number,
               s.submitted_at, s.accuracy, s.f1
        FROM submissions s
        JOIN participants p ON p.guid = s.participant_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    // Reduce to each participant's best submission
    let mut best: HashMap<String, (ScoredRow, i64)> = HashMap::new();
    for row in rows {
        match best.get_mut(&row.participant_id) {
            Some((current, attempts)) => {
                *attempts += 1;
                if best_submission_order(&row, current) == Ordering::Less {
                    *current = row;
                }
            }
            None => {
                best.insert(row.participant_id.clone(), (row, 1));
            }
        }
    }

    let mut entries: Vec<LeaderboardEntry> = best
        .into_values()
        .map(|(row, total_attempts)| LeaderboardEntry {
            rank: 0,
            participant_id: row.participant_id,
            display_name: row.display_name,
            accuracy: row.accuracy,
            f1: row.f1,
            attempt_number: row.attempt_number,
            submitted_at: row.submitted_at,
            total_attempts,
        })
        .collect();

    entries.sort_by(ranking_order);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as i64 + 1;
    }

    Ok(entries)
}

/// Find one participant's position within an already-computed ranking
pub fn rank_lookup(entries: &[LeaderboardEntry], participant_id: &str) -> RankLookup {
    RankLookup {
        rank: entries
            .iter()
            .find(|e| e.participant_id == participant_id)
            .map(|e| e.rank),
        total_participants: entries.len() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(participant: &str, attempt: i64, accuracy: f64, f1: f64) -> ScoredRow {
        ScoredRow {
            participant_id: participant.to_string(),
            display_name: participant.to_string(),
            attempt_number: attempt,
            submitted_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, attempt as u32).unwrap(),
            accuracy,
            f1,
        }
    }

    fn entry(participant: &str, accuracy: f64, f1: f64, secs: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            participant_id: participant.to_string(),
            display_name: participant.to_string(),
            accuracy,
            f1,
            attempt_number: 1,
            submitted_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, secs).unwrap(),
            total_attempts: 1,
        }
    }

    #[test]
    fn higher_accuracy_wins_best_submission() {
        let better = row("p", 2, 0.9, 0.5);
        let worse = row("p", 1, 0.8, 0.9);
        assert_eq!(best_submission_order(&better, &worse), Ordering::Less);
    }

    #[test]
    fn f1_breaks_accuracy_ties() {
        let better = row("p", 2, 0.9, 0.8);
        let worse = row("p", 1, 0.9, 0.7);
        assert_eq!(best_submission_order(&better, &worse), Ordering::Less);
    }

    #[test]
    fn earliest_attempt_breaks_full_ties() {
        let earlier = row("p", 1, 0.9, 0.8);
        let later = row("p", 2, 0.9, 0.8);
        assert_eq!(best_submission_order(&earlier, &later), Ordering::Less);
    }

    #[test]
    fn ranking_is_total_and_lexicographic() {
        let a = entry("a", 0.9, 0.9, 2);
        let b = entry("b", 0.9, 0.8, 1);
        let c = entry("c", 0.9, 0.9, 1);

        let mut entries = vec![a, b, c];
        entries.sort_by(ranking_order);

        // c ties a on (accuracy, f1) but was submitted earlier
        let order: Vec<&str> = entries.iter().map(|e| e.participant_id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        // Every adjacent pair is strictly ordered
        for pair in entries.windows(2) {
            assert_eq!(ranking_order(&pair[0], &pair[1]), Ordering::Less);
        }
    }
}

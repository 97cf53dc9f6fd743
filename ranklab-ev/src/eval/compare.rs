//! Comparison engine
//!
//! Joins a submission against the answer key by row id and produces the
//! per-row verdicts plus set-difference counts. Verdicts are emitted in
//! answer-key order so previews are reproducible.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::normalize::LabelRecord;

/// How many missing/extra row ids to keep as a diagnostic sample
const DIFF_SAMPLE_LIMIT: usize = 10;

/// One joined row: the submission's prediction against the key's label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowVerdict {
    pub row_id: String,
    pub predicted: String,
    pub actual: String,
    pub matched: bool,
}

/// Result of joining a submission against the answer key
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Joined rows in answer-key order
    pub verdicts: Vec<RowVerdict>,
    /// Answer-key ids absent from the submission
    pub missing_rows: usize,
    /// Submission ids absent from the answer key
    pub extra_rows: usize,
    /// Up to 10 missing ids, in answer-key order
    pub missing_sample: Vec<String>,
    /// Up to 10 extra ids, in submission order
    pub extra_sample: Vec<String>,
}

impl Comparison {
    pub fn rows_compared(&self) -> usize {
        self.verdicts.len()
    }
}

/// Join a submission against the answer key by row id
///
/// Duplicate ids in the submission resolve last-write-wins: the later
/// occurrence replaces the earlier one before the join. This is a policy,
/// not an error.
pub fn compare(submission: &[LabelRecord], canonical: &[LabelRecord]) -> Comparison {
    // Last occurrence wins on duplicate submission ids
    let mut predicted: HashMap<&str, &str> = HashMap::with_capacity(submission.len());
    for record in submission {
        predicted.insert(record.id.as_str(), record.label.as_str());
    }

    let mut verdicts = Vec::new();
    let mut missing_rows = 0;
    let mut missing_sample = Vec::new();

    for record in canonical {
        match predicted.get(record.id.as_str()) {
            Some(prediction) => {
                verdicts.push(RowVerdict {
                    row_id: record.id.clone(),
                    predicted: prediction.to_string(),
                    actual: record.label.clone(),
                    matched: *prediction == record.label,
                });
            }
            None => {
                missing_rows += 1;
                if missing_sample.len() < DIFF_SAMPLE_LIMIT {
                    missing_sample.push(record.id.clone());
                }
            }
        }
    }

    let canonical_ids: HashSet<&str> = canonical.iter().map(|r| r.id.as_str()).collect();
    let mut seen_extra: HashSet<&str> = HashSet::new();
    let mut extra_rows = 0;
    let mut extra_sample = Vec::new();

    for record in submission {
        let id = record.id.as_str();
        if !canonical_ids.contains(id) && seen_extra.insert(id) {
            extra_rows += 1;
            if extra_sample.len() < DIFF_SAMPLE_LIMIT {
                extra_sample.push(record.id.clone());
            }
        }
    }

    Comparison {
        verdicts,
        missing_rows,
        extra_rows,
        missing_sample,
        extra_sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, label: &str) -> LabelRecord {
        LabelRecord {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn counts_missing_rows() {
        // canonical [(1,A),(2,B)], submission [(1,A)]
        let canonical = vec![rec("1", "A"), rec("2", "B")];
        let submission = vec![rec("1", "A")];
        let cmp = compare(&submission, &canonical);
        assert_eq!(cmp.rows_compared(), 1);
        assert_eq!(cmp.missing_rows, 1);
        assert_eq!(cmp.extra_rows, 0);
        assert_eq!(cmp.missing_sample, vec!["2"]);
    }

    #[test]
    fn counts_extra_rows() {
        // canonical [(1,A),(2,B)], submission [(1,A),(2,B),(3,C)]
        let canonical = vec![rec("1", "A"), rec("2", "B")];
        let submission = vec![rec("1", "A"), rec("2", "B"), rec("3", "C")];
        let cmp = compare(&submission, &canonical);
        assert_eq!(cmp.rows_compared(), 2);
        assert_eq!(cmp.missing_rows, 0);
        assert_eq!(cmp.extra_rows, 1);
        assert_eq!(cmp.extra_sample, vec!["3"]);
    }

    #[test]
    fn duplicate_submission_id_last_write_wins() {
        let canonical = vec![rec("1", "A")];
        let submission = vec![rec("1", "B"), rec("1", "A")];
        let cmp = compare(&submission, &canonical);
        assert_eq!(cmp.rows_compared(), 1);
        assert_eq!(cmp.verdicts[0].predicted, "A");
        assert!(cmp.verdicts[0].matched);
    }

    #[test]
    fn verdicts_follow_canonical_order() {
        let canonical = vec![rec("3", "A"), rec("1", "B"), rec("2", "C")];
        let submission = vec![rec("1", "B"), rec("2", "C"), rec("3", "A")];
        let cmp = compare(&submission, &canonical);
        let order: Vec<&str> = cmp.verdicts.iter().map(|v| v.row_id.as_str()).collect();
        assert_eq!(order, vec!["3", "1", "2"]);
    }

    #[test]
    fn zero_overlap_yields_no_verdicts() {
        let canonical = vec![rec("1", "A"), rec("2", "B")];
        let submission = vec![rec("9", "A")];
        let cmp = compare(&submission, &canonical);
        assert_eq!(cmp.rows_compared(), 0);
        assert_eq!(cmp.missing_rows, 2);
        assert_eq!(cmp.extra_rows, 1);
    }

    #[test]
    fn diff_samples_are_bounded() {
        let canonical: Vec<LabelRecord> = (0..25).map(|i| rec(&format!("c{}", i), "A")).collect();
        let submission: Vec<LabelRecord> = (0..25).map(|i| rec(&format!("s{}", i), "A")).collect();
        let cmp = compare(&submission, &canonical);
        assert_eq!(cmp.missing_rows, 25);
        assert_eq!(cmp.extra_rows, 25);
        assert_eq!(cmp.missing_sample.len(), 10);
        assert_eq!(cmp.extra_sample.len(), 10);
    }

    #[test]
    fn duplicate_extra_ids_counted_once() {
        let canonical = vec![rec("1", "A")];
        let submission = vec![rec("9", "X"), rec("9", "Y"), rec("1", "A")];
        let cmp = compare(&submission, &canonical);
        assert_eq!(cmp.extra_rows, 1);
        assert_eq!(cmp.extra_sample, vec!["9"]);
    }

    #[test]
    fn label_comparison_is_case_sensitive() {
        let canonical = vec![rec("1", "Cat")];
        let submission = vec![rec("1", "cat")];
        let cmp = compare(&submission, &canonical);
        assert!(!cmp.verdicts[0].matched);
    }
}

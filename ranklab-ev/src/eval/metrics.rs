//! Classification metrics
//!
//! Accuracy plus macro-averaged precision, recall, and F1 over the joined
//! rows. Macro averaging weights every class equally regardless of
//! frequency, so a dominant class cannot mask poor performance on rare
//! classes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::compare::RowVerdict;

/// Decimal digits kept in stored metric values
const METRIC_DECIMALS: i32 = 6;

/// Evaluation metrics, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub matches: usize,
}

#[derive(Default)]
struct LabelCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

/// Compute metrics over a non-empty slice of verdicts
///
/// The caller guarantees `verdicts` is non-empty; the ledger rejects
/// zero-overlap submissions before metrics are ever computed.
///
/// The label universe is the union of all predicted and actual labels, so
/// a predicted label that never occurs in the answer key still contributes
/// a precision/recall term (necessarily zero recall, and zero precision
/// unless it somehow matches).
pub fn compute_metrics(verdicts: &[RowVerdict]) -> Metrics {
    debug_assert!(!verdicts.is_empty());

    let total = verdicts.len();
    let matches = verdicts.iter().filter(|v| v.matched).count();

    // BTreeMap keeps label iteration order deterministic
    let mut counts: BTreeMap<&str, LabelCounts> = BTreeMap::new();
    for verdict in verdicts {
        if verdict.matched {
            counts.entry(verdict.predicted.as_str()).or_default().tp += 1;
        } else {
            counts.entry(verdict.predicted.as_str()).or_default().fp += 1;
            counts.entry(verdict.actual.as_str()).or_default().fn_ += 1;
        }
    }

    let classes = counts.len();
    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    for label in counts.values() {
        let predicted_total = label.tp + label.fp;
        if predicted_total > 0 {
            precision_sum += label.tp as f64 / predicted_total as f64;
        }
        let actual_total = label.tp + label.fn_;
        if actual_total > 0 {
            recall_sum += label.tp as f64 / actual_total as f64;
        }
    }

    let accuracy = matches as f64 / total as f64;
    let precision = precision_sum / classes as f64;
    let recall = recall_sum / classes as f64;
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Metrics {
        accuracy: round_metric(accuracy),
        precision: round_metric(precision),
        recall: round_metric(recall),
        f1: round_metric(f1),
        matches,
    }
}

/// Clamp to [0, 1] and round to a fixed decimal precision so stored values
/// are deterministic across numeric implementations
fn round_metric(value: f64) -> f64 {
    let scale = 10f64.powi(METRIC_DECIMALS);
    (value.clamp(0.0, 1.0) * scale).round() / scale
}

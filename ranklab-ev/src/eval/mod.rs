//! Evaluation core: normalization, comparison, and metrics
//!
//! Everything in this module is pure computation over owned data. No I/O,
//! no shared state; a single evaluation can run on any worker.

pub mod compare;
pub mod metrics;
pub mod normalize;

pub use compare::{compare, Comparison, RowVerdict};
pub use metrics::{compute_metrics, Metrics};
pub use normalize::{normalize_rows, LabelRecord, RawRow};

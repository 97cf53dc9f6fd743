//! Record normalization
//!
//! Converts raw transport rows into the canonical in-memory form used by
//! the comparison engine: ordered (id, label) pairs, both trimmed.
//! Comparison downstream is exact-string and case-sensitive; trimming is
//! the only normalization applied.

use serde::{Deserialize, Serialize};

/// Raw row as delivered by the transport collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub row_id: String,
    pub label: String,
}

/// Canonical labeled record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: String,
    pub label: String,
}

/// Normalize raw rows into ordered label records
///
/// Rows whose trimmed id is empty are dropped; they can never join against
/// the answer key. Input order is otherwise preserved.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<LabelRecord> {
    rows.iter()
        .filter_map(|row| {
            let id = row.row_id.trim();
            if id.is_empty() {
                return None;
            }
            Some(LabelRecord {
                id: id.to_string(),
                label: row.label.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row_id: &str, label: &str) -> RawRow {
        RawRow {
            row_id: row_id.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn trims_ids_and_labels() {
        let rows = vec![raw("  1 ", " cat "), raw("2", "dog")];
        let records = normalize_rows(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].label, "cat");
        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].label, "dog");
    }

    #[test]
    fn drops_rows_with_empty_id() {
        let rows = vec![raw("   ", "cat"), raw("", "dog"), raw("3", "bird")];
        let records = normalize_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "3");
    }

    #[test]
    fn preserves_case() {
        let rows = vec![raw("A", "Cat")];
        let records = normalize_rows(&rows);
        assert_eq!(records[0].id, "A");
        assert_eq!(records[0].label, "Cat");
    }

    #[test]
    fn preserves_order() {
        let rows = vec![raw("3", "a"), raw("1", "b"), raw("2", "c")];
        let records = normalize_rows(&rows);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }
}

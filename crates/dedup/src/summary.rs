use std::collections::HashMap;

use crate::model::{CanonicalRecord, MatchStatus, RunSummary};

/// Compute summary statistics over the full batch and the survivor count.
pub fn compute_summary(
    all: &[CanonicalRecord],
    unique_records: usize,
    skipped_rows: usize,
    matches_per_pass: &[usize],
) -> RunSummary {
    let matched_records = all
        .iter()
        .filter(|r| r.match_status == MatchStatus::Matched)
        .count();

    let mut records_per_source: HashMap<String, usize> = HashMap::new();
    for record in all {
        *records_per_source.entry(record.source.clone()).or_insert(0) += 1;
    }

    RunSummary {
        total_records: all.len(),
        unique_records,
        duplicates_removed: all.len() - unique_records,
        matched_records,
        skipped_rows,
        passes_run: matches_per_pass.len(),
        matches_per_pass: matches_per_pass.to_vec(),
        records_per_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, status: MatchStatus) -> CanonicalRecord {
        CanonicalRecord {
            first_name: String::new(),
            last_name: String::new(),
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            email_address: String::new(),
            source: source.into(),
            match_status: status,
            dedup_key: String::new(),
            extra: HashMap::new(),
        }
    }

    #[test]
    fn summary_counts() {
        let all = vec![
            record("roster", MatchStatus::Matched),
            record("roster", MatchStatus::Matched),
            record("families", MatchStatus::Unmatched),
            record("teachers", MatchStatus::Unmatched),
        ];
        let summary = compute_summary(&all, 3, 2, &[1, 0]);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.unique_records, 3);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(summary.matched_records, 2);
        assert_eq!(summary.skipped_rows, 2);
        assert_eq!(summary.passes_run, 2);
        assert_eq!(summary.matches_per_pass, vec![1, 0]);
        assert_eq!(summary.records_per_source["roster"], 2);
        assert_eq!(summary.records_per_source["families"], 1);
    }
}

//! Adjacent fuzzy deduplication over a key-sorted batch.
//!
//! A single left-to-right pass compares each record's dedup key to the
//! immediately preceding record's key via Levenshtein distance, so the whole
//! scan costs O(n) distance computations. The scan works on survivor indices
//! into the shared batch: match flags land on the batch records themselves,
//! which keeps the full-batch output honest about matches found in any pass.

use crate::config::MergePolicy;
use crate::model::{CanonicalRecord, MatchEvent, MatchStatus};

pub struct PassOutput {
    /// Indices of surviving records, in scan order.
    pub survivors: Vec<usize>,
    pub matches: usize,
    pub events: Vec<MatchEvent>,
}

/// One dedup pass over `order` (survivor indices into `batch`, already in
/// key-sorted order).
///
/// The comparison anchor is always the previous record in scan order, never
/// the survivor that won the last merge: a run of mutually-adjacent
/// near-duplicates collapses to one representative, but a record just past
/// the end of the run is judged against the run's last member.
pub fn dedup_pass(
    batch: &mut [CanonicalRecord],
    order: &[usize],
    threshold: usize,
    policy: MergePolicy,
    pass: usize,
) -> PassOutput {
    let mut survivors: Vec<usize> = Vec::with_capacity(order.len());
    let mut events = Vec::new();
    let mut matches = 0;
    let mut previous: Option<usize> = None;

    for &current in order {
        if let Some(prev) = previous {
            let distance = strsim::levenshtein(&batch[prev].dedup_key, &batch[current].dedup_key);
            if distance <= threshold {
                batch[prev].match_status = MatchStatus::Matched;
                batch[current].match_status = MatchStatus::Matched;

                if !keep_previous_survivor(&batch[prev], &batch[current], policy) {
                    if let Some(last) = survivors.last_mut() {
                        *last = current;
                    }
                }

                events.push(MatchEvent {
                    pass,
                    distance,
                    previous: batch[prev].display_line(),
                    current: batch[current].display_line(),
                });
                matches += 1;
                previous = Some(current);
                continue;
            }
        }

        survivors.push(current);
        previous = Some(current);
    }

    PassOutput {
        survivors,
        matches,
        events,
    }
}

/// Resolution policy: does the previously appended survivor stay?
fn keep_previous_survivor(
    previous: &CanonicalRecord,
    current: &CanonicalRecord,
    policy: MergePolicy,
) -> bool {
    match policy {
        MergePolicy::PreferPrevious => true,
        MergePolicy::PreferComplete => {
            if !previous.email_address.is_empty() && !previous.first_name.is_empty() {
                // Previous record is already complete enough.
                true
            } else if current.first_name.is_empty() {
                true
            } else {
                // Newer, more complete record is authoritative.
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(key: &str, first: &str, email: &str) -> CanonicalRecord {
        CanonicalRecord {
            first_name: first.into(),
            last_name: String::new(),
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            email_address: email.into(),
            source: "test".into(),
            match_status: MatchStatus::Unmatched,
            dedup_key: key.into(),
            extra: HashMap::new(),
        }
    }

    fn run_pass(
        batch: &mut Vec<CanonicalRecord>,
        threshold: usize,
        policy: MergePolicy,
    ) -> PassOutput {
        let order: Vec<usize> = (0..batch.len()).collect();
        dedup_pass(batch, &order, threshold, policy, 1)
    }

    #[test]
    fn identical_keys_merge() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "", ""),
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 1);
        assert_eq!(out.survivors.len(), 1);
        // Previous has no email, current has a first name: current wins.
        assert_eq!(out.survivors[0], 1);
        assert_eq!(batch[0].match_status, MatchStatus::Matched);
        assert_eq!(batch[1].match_status, MatchStatus::Matched);
    }

    #[test]
    fn complete_previous_record_survives() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
            record("SMITH123MAINST02101", "J", ""),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 1);
        assert_eq!(out.survivors, vec![0]);
    }

    #[test]
    fn nameless_current_record_loses() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "Jane", ""),
            record("SMITH123MAINST02101", "", "household@example.com"),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 1);
        assert_eq!(out.survivors, vec![0]);
    }

    #[test]
    fn prefer_previous_never_replaces() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "", ""),
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferPrevious);
        assert_eq!(out.matches, 1);
        assert_eq!(out.survivors, vec![0]);
    }

    #[test]
    fn distant_keys_never_merge() {
        let mut batch = vec![
            record("JONES456OAKAVE90210", "John", ""),
            record("SMITH123MAINST02101", "Jane", ""),
        ];
        let out = run_pass(&mut batch, 4, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 0);
        assert_eq!(out.survivors, vec![0, 1]);
        assert_eq!(batch[0].match_status, MatchStatus::Unmatched);
        assert_eq!(batch[1].match_status, MatchStatus::Unmatched);
    }

    #[test]
    fn within_threshold_keys_merge() {
        // One substitution and one insertion apart.
        let mut batch = vec![
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
            record("SMITHE123MAINST02102", "J", ""),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 1);
    }

    #[test]
    fn empty_key_matches_only_short_keys() {
        // Empty-vs-nonempty distance equals the nonempty length; a long key
        // stays distinct, a very short one is an accepted false match.
        let mut batch = vec![
            record("", "Jane", ""),
            record("SMITH123MAINST02101", "John", ""),
        ];
        let out = run_pass(&mut batch, 4, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 0);

        let mut short = vec![record("", "Jane", ""), record("ABC", "John", "")];
        let out = run_pass(&mut short, 4, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 1);
    }

    #[test]
    fn anchor_is_previous_input_not_survivor() {
        // b replaces a in the output, yet c is compared against b (the
        // previous input record), which it is far from.
        let mut batch = vec![
            record("AAAA", "", ""),
            record("AAZZ", "Jane", "j@example.com"),
            record("AZZZZZ", "John", ""),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 1);
        assert_eq!(out.survivors, vec![1, 2]);
    }

    #[test]
    fn run_of_near_duplicates_collapses_to_one() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
            record("SMITH123MAINST02102", "J", ""),
            record("SMITH123MAINST02103", "", ""),
        ];
        let out = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        assert_eq!(out.matches, 2);
        assert_eq!(out.survivors, vec![0]);
        assert!(batch.iter().all(|r| r.match_status == MatchStatus::Matched));
    }

    #[test]
    fn output_never_grows() {
        let mut batch = vec![
            record("AAAA", "a", ""),
            record("AAAB", "b", ""),
            record("CCCC", "c", ""),
            record("ZZZZ", "z", ""),
        ];
        let out = run_pass(&mut batch, 1, MergePolicy::PreferComplete);
        assert!(out.survivors.len() <= batch.len());
    }

    #[test]
    fn pass_is_idempotent_on_own_output() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
            record("SMITH123MAINST02102", "J", ""),
            record("WILSON9ELMST44101", "Tom", ""),
        ];
        let first = run_pass(&mut batch, 2, MergePolicy::PreferComplete);
        let second = dedup_pass(&mut batch, &first.survivors, 2, MergePolicy::PreferComplete, 2);
        assert_eq!(second.matches, 0);
        assert_eq!(second.survivors, first.survivors);
    }

    #[test]
    fn second_pass_catches_merge_created_adjacency() {
        // Sorted keys: AAAA < AAAAMMM < AAAB. Pass 1 merges the first pair
        // (distance 3) keeping AAAA, but AAAB is judged against AAAAMMM
        // (distance 4) and survives. Pass 2 sees AAAA and AAAB adjacent
        // (distance 1) and merges them.
        let mut batch = vec![
            record("AAAA", "Jane", "jane@example.com"),
            record("AAAAMMM", "J", ""),
            record("AAAB", "John", ""),
        ];
        let first = run_pass(&mut batch, 3, MergePolicy::PreferComplete);
        assert_eq!(first.matches, 1);
        assert_eq!(first.survivors, vec![0, 2]);

        let second = dedup_pass(&mut batch, &first.survivors, 3, MergePolicy::PreferComplete, 2);
        assert_eq!(second.matches, 1);
        assert_eq!(second.survivors, vec![0]);
        assert_eq!(second.events[0].pass, 2);
    }

    #[test]
    fn match_events_carry_both_records() {
        let mut batch = vec![
            record("SMITH123MAINST02101", "Jane", "jane@example.com"),
            record("SMITH123MAINST02101", "J", ""),
        ];
        let out = run_pass(&mut batch, 0, MergePolicy::PreferComplete);
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].distance, 0);
        assert!(out.events[0].previous.contains("Jane"));
        assert!(out.events[0].current.contains('J'));
    }
}

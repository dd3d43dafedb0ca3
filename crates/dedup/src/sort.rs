use crate::model::CanonicalRecord;

/// Stable ascending sort by `dedup_key`, in ordinal code-point order (not
/// locale-aware). Equal keys keep their relative input order, which pins
/// merge outcomes when several records share a key. True near-duplicates
/// land adjacent after this sort because household keys differ by at most a
/// handful of characters, so the deduplicator only ever compares neighbors.
pub fn sort_by_key(records: &mut [CanonicalRecord]) {
    records.sort_by(|a, b| a.dedup_key.cmp(&b.dedup_key));
}

//! Row-to-record normalization: name and address splitting, state and zip
//! cleanup, and dedup-key construction.

use std::collections::HashMap;

use crate::config::SourceFormat;
use crate::error::DedupError;
use crate::model::{CanonicalRecord, MatchStatus};
use crate::states;

/// One raw row as header -> value.
pub type RawRow = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Field-level helpers
// ---------------------------------------------------------------------------

/// Split a combined name on the last whitespace boundary: everything before
/// is the first name, the final token the last name.
pub fn split_name(source: &str, value: &str) -> Result<(String, String), DedupError> {
    let value = value.trim();
    match value.rsplit_once(char::is_whitespace) {
        Some((first, last)) if !first.is_empty() && !last.is_empty() => {
            Ok((first.trim_end().to_string(), last.to_string()))
        }
        _ => Err(DedupError::MalformedName {
            source: source.into(),
            value: value.into(),
        }),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Decompose a multi-line address blob into street / "city, state" / zip,
/// with an ignored trailer. Anything but exactly four newline-separated
/// segments is malformed, as is a city-state segment without a comma.
pub fn split_address(source: &str, blob: &str) -> Result<AddressParts, DedupError> {
    let malformed = || DedupError::MalformedAddress {
        source: source.into(),
        value: blob.into(),
    };

    let segments: Vec<&str> = blob.split('\n').collect();
    let (street, city_state, zip) = match segments.as_slice() {
        [street, city_state, zip, _trailer] => (*street, *city_state, *zip),
        _ => return Err(malformed()),
    };
    let (city, state) = city_state.split_once(',').ok_or_else(malformed)?;

    Ok(AddressParts {
        street: street.trim().to_string(),
        city: city.trim().to_string(),
        state: state.trim().to_string(),
        zip: zip.trim().to_string(),
    })
}

/// Keep only the portion before the first hyphen (ZIP+4 suffix discarded).
pub fn normalize_zip(zip: &str) -> String {
    zip.split('-').next().unwrap_or_default().trim().to_string()
}

/// Composite dedup key: last name + street + zip, uppercased, no delimiter.
/// The missing delimiter is intentional: a field-boundary shift (say, a
/// trailing surname character sliding into the street) still yields a string
/// close in edit distance, which the adjacent fuzzy scan exploits.
pub fn build_key(last_name: &str, street_address: &str, zip: &str) -> String {
    format!("{last_name}{street_address}{zip}").to_uppercase()
}

// ---------------------------------------------------------------------------
// Row normalization
// ---------------------------------------------------------------------------

/// Convert one raw row into a canonical record.
///
/// Returns `Ok(None)` for rows excluded by the `NOT AVAILABLE` state rule.
/// Normalization failures are fatal for the batch: a malformed name or
/// address is a data-quality problem to fix at the source, not a record to
/// silently drop or guess at.
pub fn normalize_row(
    source: &str,
    format: SourceFormat,
    row: &RawRow,
) -> Result<Option<CanonicalRecord>, DedupError> {
    match format {
        SourceFormat::ParentRoster => normalize_parent_roster(source, row),
        SourceFormat::ContactList => normalize_contact_list(source, row),
    }
}

fn field(row: &RawRow, name: &str) -> String {
    row.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn is_not_available(state: &str) -> bool {
    state.eq_ignore_ascii_case("not available")
}

fn normalize_state(source: &str, value: &str) -> Result<String, DedupError> {
    states::normalize(value)
        .map(str::to_string)
        .ok_or_else(|| DedupError::UnknownState {
            source: source.into(),
            value: value.into(),
        })
}

fn normalize_parent_roster(
    source: &str,
    row: &RawRow,
) -> Result<Option<CanonicalRecord>, DedupError> {
    let (first_name, last_name) = split_name(source, &field(row, "Parent Name"))?;
    let parts = split_address(source, row.get("Address").map(String::as_str).unwrap_or(""))?;

    if is_not_available(&parts.state) {
        return Ok(None);
    }
    let state = normalize_state(source, &parts.state)?;
    let zip = normalize_zip(&parts.zip);
    let dedup_key = build_key(&last_name, &parts.street, &zip);

    Ok(Some(CanonicalRecord {
        first_name,
        last_name,
        street_address: parts.street,
        city: parts.city,
        state,
        zip,
        email_address: field(row, "Parent email"),
        source: source.to_string(),
        match_status: MatchStatus::Unmatched,
        dedup_key,
        extra: row.clone(),
    }))
}

fn normalize_contact_list(
    source: &str,
    row: &RawRow,
) -> Result<Option<CanonicalRecord>, DedupError> {
    let state_raw = field(row, "State");
    if is_not_available(&state_raw) {
        return Ok(None);
    }
    let state = normalize_state(source, &state_raw)?;

    // Two street conventions: a single column, or a line-1/line-2 pair.
    let street_address = match (row.get("street1"), row.get("street2")) {
        (Some(line1), Some(line2)) => format!("{}, {}", line1.trim(), line2.trim()),
        _ => field(row, "Street address"),
    };

    let first_name = field(row, "First name");
    let last_name = field(row, "Last name");
    let zip = normalize_zip(&field(row, "Zip"));
    let dedup_key = build_key(&last_name, &street_address, &zip);

    Ok(Some(CanonicalRecord {
        first_name,
        last_name,
        street_address,
        city: field(row, "City"),
        state,
        zip,
        email_address: field(row, "Email address"),
        source: source.to_string(),
        match_status: MatchStatus::Unmatched,
        dedup_key,
        extra: row.clone(),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Header order for the tabular outputs. Internal fields (`dedup_key`,
/// preserved source columns) never appear here.
pub const OUTPUT_HEADERS: [&str; 9] = [
    "First name",
    "Last name",
    "Street address",
    "City",
    "State",
    "Zip",
    "Email address",
    "Source",
    "Match",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Unmatched,
    Matched,
}

impl MatchStatus {
    /// Value written to the `Match` output column.
    pub fn output_value(self) -> &'static str {
        match self {
            Self::Unmatched => "",
            Self::Matched => "MATCH",
        }
    }
}

/// A single normalized row from any source file.
///
/// All core fields are always populated (empty string when the source lacked
/// them). `dedup_key` is computed once at normalization time and never
/// changes afterward; only `match_status` mutates during deduplication.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalRecord {
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub email_address: String,
    pub source: String,
    pub match_status: MatchStatus,
    pub dedup_key: String,
    /// Source-specific columns outside the canonical contract, preserved
    /// verbatim but never emitted in output.
    #[serde(skip)]
    pub extra: HashMap<String, String>,
}

impl CanonicalRecord {
    /// Field values in `OUTPUT_HEADERS` order.
    pub fn output_fields(&self) -> [&str; 9] {
        [
            &self.first_name,
            &self.last_name,
            &self.street_address,
            &self.city,
            &self.state,
            &self.zip,
            &self.email_address,
            &self.source,
            self.match_status.output_value(),
        ]
    }

    /// One-line rendering for match-event logs.
    pub fn display_line(&self) -> String {
        let source: String = self.source.chars().take(9).collect();
        format!(
            "{source:<9}  {} {} {}, {}, {}",
            self.first_name, self.last_name, self.street_address, self.city, self.state
        )
    }
}

/// Pre-loaded records concatenated across all sources, in config order.
pub struct BatchInput {
    pub records: Vec<CanonicalRecord>,
    /// Rows excluded by the `NOT AVAILABLE` state rule during loading.
    pub skipped_rows: usize,
}

// ---------------------------------------------------------------------------
// Match events
// ---------------------------------------------------------------------------

/// Audit record of one adjacent match found during a dedup pass.
#[derive(Debug, Clone, Serialize)]
pub struct MatchEvent {
    pub pass: usize,
    pub distance: usize,
    pub previous: String,
    pub current: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub unique_records: usize,
    pub duplicates_removed: usize,
    pub matched_records: usize,
    pub skipped_rows: usize,
    pub passes_run: usize,
    pub matches_per_pass: Vec<usize>,
    pub records_per_source: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Full engine output: the normalized batch (with match flags), the
/// deduplicated batch, and the audit trail. The record vectors are carried
/// for the CSV outputs and skipped in the JSON report.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub events: Vec<MatchEvent>,
    #[serde(skip)]
    pub all: Vec<CanonicalRecord>,
    #[serde(skip)]
    pub unique: Vec<CanonicalRecord>,
}

use crate::config::{MergeConfig, SourceFormat};
use crate::dedup::dedup_pass;
use crate::error::DedupError;
use crate::model::{BatchInput, CanonicalRecord, MatchEvent, RunMeta, RunResult};
use crate::normalize::{normalize_row, RawRow};
use crate::sort::sort_by_key;
use crate::summary::compute_summary;

/// Run the merge-and-dedup pipeline per config. The input batch is consumed:
/// match flags found in any pass land on the full batch, so the `all` output
/// shows every detected duplicate, including losers removed in a later pass.
pub fn run(config: &MergeConfig, input: BatchInput) -> Result<RunResult, DedupError> {
    let mut batch = input.records;
    sort_by_key(&mut batch);

    // Bounded convergence loop: keys never change, so the sorted order from
    // above holds across passes and each pass scans the previous survivors.
    let mut survivors: Vec<usize> = (0..batch.len()).collect();
    let mut matches_per_pass: Vec<usize> = Vec::new();
    let mut events: Vec<MatchEvent> = Vec::new();

    for pass in 1..=config.dedup.passes {
        let out = dedup_pass(
            &mut batch,
            &survivors,
            config.dedup.threshold,
            config.dedup.policy,
            pass,
        );
        matches_per_pass.push(out.matches);
        events.extend(out.events);
        survivors = out.survivors;
        if out.matches == 0 {
            break;
        }
    }

    let unique: Vec<CanonicalRecord> = survivors.iter().map(|&i| batch[i].clone()).collect();
    let summary = compute_summary(&batch, unique.len(), input.skipped_rows, &matches_per_pass);

    Ok(RunResult {
        meta: RunMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        events,
        all: batch,
        unique,
    })
}

/// Records loaded from one source, plus the count of rows excluded by the
/// `NOT AVAILABLE` state rule.
#[derive(Debug)]
pub struct LoadedRows {
    pub records: Vec<CanonicalRecord>,
    pub skipped: usize,
}

/// Parse one source's tabular data into canonical records.
///
/// The delimiter follows the declared format. Required columns are checked
/// against the header row up front so a schema mismatch fails before any row
/// is normalized.
pub fn load_csv_rows(
    source_name: &str,
    data: &str,
    format: SourceFormat,
) -> Result<LoadedRows, DedupError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(format.delimiter())
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DedupError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for column in format.required_columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(DedupError::MissingColumn {
                source: source_name.into(),
                column: (*column).into(),
            });
        }
    }

    // Contact lists carry the street in one of two shapes.
    if format == SourceFormat::ContactList {
        let has_single = headers.iter().any(|h| h == "Street address");
        let has_pair = headers.iter().any(|h| h == "street1")
            && headers.iter().any(|h| h == "street2");
        if !has_single && !has_pair {
            return Err(DedupError::MissingColumn {
                source: source_name.into(),
                column: "Street address".into(),
            });
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in reader.records() {
        let record = result.map_err(|e| DedupError::Io(e.to_string()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();

        match normalize_row(source_name, format, &row)? {
            Some(canonical) => records.push(canonical),
            None => skipped += 1,
        }
    }

    Ok(LoadedRows { records, skipped })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! `mailfold` — config-driven address-list merge and household deduplication.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mailfold_dedup::engine::load_csv_rows;
use mailfold_dedup::model::{BatchInput, CanonicalRecord, OUTPUT_HEADERS};
use mailfold_dedup::{DedupError, MergeConfig, RunResult};

use exit_codes::{EXIT_DATA, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

#[derive(Parser)]
#[command(name = "mailfold")]
#[command(about = "Merge address-list exports and collapse household duplicates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a merge from a TOML config file
    #[command(after_help = "\
Examples:
  mailfold run merge.toml
  mailfold run merge.toml --json
  mailfold run merge.toml --output report.json")]
    Run {
        /// Path to the merge config file
        config: PathBuf,

        /// Print the JSON report to stdout instead of only the human summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a merge config without running
    #[command(after_help = "\
Examples:
  mailfold validate merge.toml")]
    Validate {
        /// Path to the merge config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
        } => cmd_run(&config, json, output.as_deref()),
        Commands::Validate { config } => cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn cli_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError {
        code,
        message: msg.into(),
        hint: None,
    }
}

/// Map engine errors to the exit-code registry: config problems are usage
/// errors, IO problems are runtime, everything else is bad source data.
fn engine_err(e: DedupError) -> CliError {
    let code = match e {
        DedupError::ConfigParse(_) | DedupError::ConfigValidation(_) => EXIT_USAGE,
        DedupError::Io(_) => EXIT_RUNTIME,
        _ => EXIT_DATA,
    };
    cli_err(code, e.to_string())
}

fn cmd_run(config_path: &Path, json_output: bool, output_file: Option<&Path>) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| cli_err(EXIT_USAGE, format!("cannot read config: {e}")))?;
    let config = MergeConfig::from_toml(&config_str).map_err(engine_err)?;

    // Source and output paths resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_sources(&config, base_dir)?;
    let result = mailfold_dedup::run(&config, input).map_err(engine_err)?;

    for event in &result.events {
        eprintln!(
            "match (pass {}, distance {}):\n  {}\n  {}",
            event.pass, event.distance, event.current, event.previous
        );
    }

    let all_path = base_dir.join(&config.output.all);
    let unique_path = base_dir.join(&config.output.unique);
    write_records_csv(&all_path, &result.all)?;
    write_records_csv(&unique_path, &result.unique)?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(rel) = &config.output.json {
        let path = base_dir.join(rel);
        std::fs::write(&path, &json_str)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json_output {
        println!("{json_str}");
    }

    print_summary(&result, &all_path, &unique_path);
    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| cli_err(EXIT_USAGE, format!("cannot read config: {e}")))?;
    match MergeConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: merge '{}' with {} source(s), threshold {}, {} pass(es)",
                config.name,
                config.sources.len(),
                config.dedup.threshold,
                config.dedup.passes,
            );
            Ok(())
        }
        Err(e) => Err(engine_err(e)),
    }
}

/// Read every configured source and concatenate the normalized records in
/// config order.
fn load_sources(config: &MergeConfig, base_dir: &Path) -> Result<BatchInput, CliError> {
    let mut records: Vec<CanonicalRecord> = Vec::new();
    let mut skipped_rows = 0;

    for source in &config.sources {
        let path = base_dir.join(&source.file);
        let data = std::fs::read_to_string(&path)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read {}: {e}", path.display())))?;
        let loaded =
            load_csv_rows(&source_stem(&source.file), &data, source.format).map_err(engine_err)?;
        records.extend(loaded.records);
        skipped_rows += loaded.skipped;
    }

    Ok(BatchInput {
        records,
        skipped_rows,
    })
}

/// Source identifier: the file's base name with its extension stripped.
fn source_stem(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

fn write_records_csv(path: &Path, records: &[CanonicalRecord]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot create {}: {e}", parent.display())))?;
    }

    let write_err = |e: csv::Error| cli_err(EXIT_RUNTIME, format!("cannot write {}: {e}", path.display()));
    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(OUTPUT_HEADERS).map_err(write_err)?;
    for record in records {
        writer.write_record(record.output_fields()).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write {}: {e}", path.display())))?;

    eprintln!("{} records written to {}", records.len(), path.display());
    Ok(())
}

fn print_summary(result: &RunResult, all_path: &Path, unique_path: &Path) {
    let s = &result.summary;
    eprintln!(
        "merged {} records — {} matched across {} pass(es), {} unique, {} skipped",
        s.total_records, s.matched_records, s.passes_run, s.unique_records, s.skipped_rows,
    );
    eprintln!(
        "outputs: {} (full batch), {} (deduplicated)",
        all_path.display(),
        unique_path.display(),
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::error::DedupError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct MergeConfig {
    pub name: String,
    /// Ordered: concatenation order feeds the stable sort, so source order
    /// decides merge outcomes for identical keys.
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub dedup: DedupOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    pub format: SourceFormat,
}

/// Known input schema variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Comma-delimited: combined `Parent Name`, `Parent email`, and a
    /// newline-delimited `Address` blob.
    ParentRoster,
    /// Tab-delimited: separate first/last/state/zip/email columns, with
    /// either `Street address` or the `street1`/`street2` pair.
    ContactList,
}

impl SourceFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            Self::ParentRoster => b',',
            Self::ContactList => b'\t',
        }
    }

    /// Columns that must be present in the header row.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::ParentRoster => &["Parent Name", "Parent email", "Address"],
            Self::ContactList => &["First name", "Last name", "State", "Zip", "Email address"],
        }
    }
}

// ---------------------------------------------------------------------------
// Dedup options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DedupOptions {
    /// Edit-distance threshold for an adjacent match. Tightening it trades
    /// false merges against missed merges; 2-4 in practice.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Bounded convergence loop: sort+dedup repeats up to this many times,
    /// stopping early once a pass finds no matches. Approximates a fixpoint,
    /// not transitive closure.
    #[serde(default = "default_passes")]
    pub passes: usize,
    #[serde(default)]
    pub policy: MergePolicy,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            passes: default_passes(),
            policy: MergePolicy::default(),
        }
    }
}

fn default_threshold() -> usize {
    4
}

fn default_passes() -> usize {
    2
}

/// Which of two matched records survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the previous survivor when it already carries an email and a
    /// first name, or when the newer record has no first name; otherwise the
    /// newer record replaces it.
    #[default]
    PreferComplete,
    /// The survivor never changes once appended.
    PreferPrevious,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Full normalized batch, match flags included.
    #[serde(default = "default_all_path")]
    pub all: String,
    /// Deduplicated batch.
    #[serde(default = "default_unique_path")]
    pub unique: String,
    /// Optional JSON report (meta + summary + match events).
    #[serde(default)]
    pub json: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            all: default_all_path(),
            unique: default_unique_path(),
            json: None,
        }
    }
}

fn default_all_path() -> String {
    "all.csv".into()
}

fn default_unique_path() -> String {
    "unique.csv".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, DedupError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| DedupError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        if self.sources.is_empty() {
            return Err(DedupError::ConfigValidation(
                "at least 1 source is required".into(),
            ));
        }

        if self.dedup.passes == 0 || self.dedup.passes > 8 {
            return Err(DedupError::ConfigValidation(format!(
                "passes must be 1..=8, got {}",
                self.dedup.passes
            )));
        }

        if self.dedup.threshold > 16 {
            return Err(DedupError::ConfigValidation(format!(
                "threshold must be at most 16, got {}",
                self.dedup.threshold
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

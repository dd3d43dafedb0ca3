use std::fmt;

#[derive(Debug)]
pub enum DedupError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no sources, bad pass count, etc.).
    ConfigValidation(String),
    /// Missing required column in input data.
    MissingColumn { source: String, column: String },
    /// Combined name field has no separable surname.
    MalformedName { source: String, value: String },
    /// Address blob does not decompose into street / city-state / zip segments.
    MalformedAddress { source: String, value: String },
    /// State value matches neither an abbreviation nor a known full name.
    UnknownState { source: String, value: String },
    /// IO error (file read, malformed CSV, etc.).
    Io(String),
}

impl fmt::Display for DedupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, column } => {
                write!(f, "source '{source}': missing column '{column}'")
            }
            Self::MalformedName { source, value } => {
                write!(f, "source '{source}': cannot split name '{value}' into first/last")
            }
            Self::MalformedAddress { source, value } => {
                write!(f, "source '{source}': cannot split address {value:?}")
            }
            Self::UnknownState { source, value } => {
                write!(f, "source '{source}': unknown state '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for DedupError {}

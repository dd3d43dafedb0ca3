//! `mailfold-dedup` — address-list merge and fuzzy household deduplication.
//!
//! Pure engine crate: receives pre-loaded rows, returns the normalized batch
//! and its deduplicated counterpart. No CLI or path-handling dependencies.

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod sort;
pub mod states;
pub mod summary;

pub use config::MergeConfig;
pub use engine::run;
pub use error::DedupError;
pub use model::{BatchInput, CanonicalRecord, MatchStatus, RunResult};

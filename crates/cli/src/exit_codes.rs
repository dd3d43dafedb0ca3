//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | Usage error: bad arguments, invalid config         |
//! | 3    | Data error: malformed row, unknown state, column   |
//! | 4    | Runtime error: file IO, output write               |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid or unreadable config.
pub const EXIT_USAGE: u8 = 2;

/// Data error - a source row failed normalization and the batch aborted.
pub const EXIT_DATA: u8 = 3;

/// Runtime error - file IO, CSV/JSON write failures.
pub const EXIT_RUNTIME: u8 = 4;

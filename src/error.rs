//! Error types for the whole crate.
//!
//! Every fallible public entry point returns `Result<T, AppError>` (aliased
//! below as `Result<T>`). `safe_decode` and the tree accumulator are
//! deliberately excluded: they are total functions per the decoder's
//! contract and never produce an `AppError`.

use std::io;

/// Unifies I/O, format, and pattern-compilation failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The file does not start with the `\0mlocate` magic.
    #[error("not an mlocate database (bad magic)")]
    BadMagic,

    /// The stream ended in the middle of a record.
    #[error("truncated database: stream ended mid-record")]
    TruncatedInput,

    /// An error talking to the underlying file.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// A glob-translated or user-supplied regex failed to compile.
    #[error("invalid pattern: {0}")]
    PatternSyntax(#[from] regex::Error),

    /// Failed to serialize a `find --action json` report.
    #[error("failed to serialize json output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

//! Error types for tcxsync
//!
//! Uses `thiserror` for library errors. The binary wraps these in
//! `anyhow::Result` at the command layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tcxsync operations
pub type TcxResult<T> = Result<T, TcxError>;

/// Main error type for tcxsync operations
#[derive(Error, Debug)]
pub enum TcxError {
    /// Referenced document or snapshot file is absent
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// A transform was requested with no classes/domains selected
    #[error("no selection made - select at least one entry")]
    EmptySelection,

    /// Document could not be decoded by the codec
    #[error("cannot decode {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A class, domain, or element in the document lacks a name
    #[error("malformed document {path}: entry without a name")]
    MissingName { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

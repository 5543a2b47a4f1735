//! Error types for docpipe operations.
//!
//! This module defines [`DocpipeError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `DocpipeError` for driver-level failures that abort the run
//!   (unreadable metadata, bad configuration)
//! - Per-document findings are never errors in this sense: they are
//!   accumulated as [`crate::report::Diagnostic`] values and the run
//!   continues, so one invocation surfaces the complete picture
//! - Use `anyhow::Error` (via `DocpipeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for docpipe operations.
#[derive(Debug, Error)]
pub enum DocpipeError {
    /// Configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Metadata registry file not found at expected location.
    #[error("Metadata not found: {path}")]
    MetadataNotFound { path: PathBuf },

    /// Metadata registry file could not be parsed.
    #[error("Failed to parse metadata at {path}: {message}")]
    MetadataParseError { path: PathBuf, message: String },

    /// Docs root does not exist or is not a directory.
    #[error("Docs root not found: {path}")]
    DocsRootNotFound { path: PathBuf },

    /// A document could not be read or written.
    #[error("Failed to {action} document {path}: {message}")]
    DocumentIoError {
        action: &'static str,
        path: PathBuf,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for docpipe operations.
pub type Result<T> = std::result::Result<T, DocpipeError>;

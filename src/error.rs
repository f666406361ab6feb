// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for tidyup

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tidyup operations
pub type Result<T> = std::result::Result<T, TidyError>;

/// Operation-level errors.
///
/// Per-file move and rename failures are not errors at this level; they are
/// recorded as outcomes in the operation's report.
#[derive(Error, Debug)]
pub enum TidyError {
    #[error("Directory '{}' not found or is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot expand '~': home directory not found")]
    HomeNotFound,
}

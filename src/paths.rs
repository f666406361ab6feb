// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Target directory handling

use std::path::{Path, PathBuf};

use crate::{Result, TidyError};

/// Expand a leading `~` (alone or followed by a separator) to the home directory
pub fn expand_tilde(input: &str) -> Result<PathBuf> {
    let input = input.trim();
    let rest = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return Ok(PathBuf::from(input)),
    };

    let home = dirs::home_dir().ok_or(TidyError::HomeNotFound)?;
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Fail with [`TidyError::NotADirectory`] unless `path` is an existing directory
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(TidyError::NotADirectory(path.to_path_buf()))
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! tidyup: File Organizer & Sequential Renamer
//!
//! Sorts the files of a single directory into category folders by extension,
//! and renames them to a numbered, prefix-based scheme without clobbering
//! existing names.

pub mod categories;
pub mod config;
pub mod error;
pub mod fs_ops;
pub mod menu;
pub mod organizer;
pub mod paths;
pub mod renamer;

pub use categories::CategoryTable;
pub use config::AppConfig;
pub use error::{Result, TidyError};

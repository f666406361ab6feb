// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Sort files into category folders by extension

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::categories::CategoryTable;
use crate::fs_ops::{list_entries, FileOps};
use crate::paths::ensure_directory;
use crate::Result;

/// What happened to one top-level file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MoveAction {
    Moved { category: String },
    Failed { category: String, error: String },
    /// No extension, left in place
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub file: String,
    #[serde(flatten)]
    pub action: MoveAction,
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            MoveAction::Moved { category } => write!(f, "Moved '{}' to '{}'", self.file, category),
            MoveAction::Failed { category, error } => write!(
                f,
                "Error moving '{}' to '{}': {}. Skipping.",
                self.file, category, error
            ),
            MoveAction::Skipped => write!(f, "Left '{}' in place (no extension)", self.file),
        }
    }
}

/// Per-file results of one organize run, in file name order
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    pub outcomes: Vec<MoveOutcome>,
}

impl OrganizeReport {
    pub fn moved(&self) -> usize {
        self.count(|a| matches!(a, MoveAction::Moved { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|a| matches!(a, MoveAction::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|a| matches!(a, MoveAction::Skipped))
    }

    fn count(&self, pred: impl Fn(&MoveAction) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.action)).count()
    }
}

/// Move every top-level file of `dir` into the folder its extension maps to.
///
/// All category folders, the fallback included, are created first. Directories
/// are never descended into or moved. A file whose destination already exists
/// is reported as failed and stays where it is; a failed move is final and is
/// not retried into the fallback folder.
pub fn organize(dir: &Path, table: &CategoryTable, ops: &dyn FileOps) -> Result<OrganizeReport> {
    ensure_directory(dir)?;
    info!("Organizing files in: {:?}", dir);

    for folder in table.folder_names() {
        ops.create_dir_all(&dir.join(folder))?;
    }

    let mut report = OrganizeReport::default();

    for entry in list_entries(dir)? {
        if entry.is_dir {
            continue;
        }

        let file = entry.display_name();
        let extension = entry.extension();
        let Some(category) = table.classify(&extension).folder() else {
            debug!("No extension, leaving {:?}", entry.path);
            report.outcomes.push(MoveOutcome {
                file,
                action: MoveAction::Skipped,
            });
            continue;
        };

        let destination = dir.join(category).join(&entry.file_name);
        let result = if ops.exists(&destination) {
            Err("destination already exists".to_string())
        } else {
            ops.move_file(&entry.path, &destination).map_err(|e| e.to_string())
        };

        let action = match result {
            Ok(()) => {
                debug!("Moved {:?} to {}", file, category);
                MoveAction::Moved { category: category.to_string() }
            }
            Err(error) => {
                warn!("Error moving {:?} to {}: {}", file, category, error);
                MoveAction::Failed { category: category.to_string(), error }
            }
        };

        report.outcomes.push(MoveOutcome { file, action });
    }

    info!(
        "Organize finished: {} moved, {} failed, {} left in place",
        report.moved(),
        report.failed(),
        report.skipped()
    );
    Ok(report)
}

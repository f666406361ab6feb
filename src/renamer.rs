// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Sequential, prefix-based renaming

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::fs_ops::{list_entries, FileOps};
use crate::paths::ensure_directory;
use crate::Result;

/// Prefix and first sequence number for a rename run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    pub prefix: String,
    pub start: i64,
}

/// Original name and the name chosen for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameStep {
    pub original: String,
    /// Empty when no sequence number was left to assign
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameResult {
    Renamed,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    #[serde(flatten)]
    pub step: RenameStep,
    #[serde(flatten)]
    pub result: RenameResult,
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            RenameResult::Renamed => {
                write!(f, "Renamed '{}' to '{}'", self.step.original, self.step.target)
            }
            RenameResult::Failed { error } => {
                write!(f, "Error renaming '{}': {}. Skipping.", self.step.original, error)
            }
        }
    }
}

/// Per-file results of one rename run, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
    /// Sequence number the next renamed file would have received, `None`
    /// once the number range is used up
    pub next_number: Option<i64>,
}

impl RenameReport {
    pub fn renamed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result == RenameResult::Renamed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.renamed()
    }
}

/// `prefix + number + ext`, or `prefix + number + "_" + counter + ext` when
/// `collision` is non-zero
pub fn target_name(prefix: &str, number: i64, collision: u32, extension: &str) -> String {
    if collision == 0 {
        format!("{}{}{}", prefix, number, extension)
    } else {
        format!("{}{}_{}{}", prefix, number, collision, extension)
    }
}

/// First free target name in `dir` for the given number.
///
/// Existence is checked through `ops`, so names taken earlier in the same run
/// are seen as occupied.
pub fn free_target(
    dir: &Path,
    prefix: &str,
    number: i64,
    extension: &str,
    ops: &dyn FileOps,
) -> String {
    let mut collision = 0;
    loop {
        let candidate = target_name(prefix, number, collision, extension);
        if !ops.exists(&dir.join(&candidate)) {
            return candidate;
        }
        collision += 1;
    }
}

/// Rename every regular file in `dir` to `<prefix><n><ext>`.
///
/// Files are processed in code-point order of their names, so an unchanged
/// directory always gets the same numbering. The extension is lowercased and
/// the original stem is dropped. The sequence number only advances when a
/// rename succeeds; a failure leaves the number for the next file.
pub fn rename_sequential(
    dir: &Path,
    options: &RenameOptions,
    ops: &dyn FileOps,
) -> Result<RenameReport> {
    ensure_directory(dir)?;
    info!("Renaming files in: {:?}", dir);

    let files: Vec<_> = list_entries(dir)?.into_iter().filter(|e| e.is_file).collect();

    let mut current = Some(options.start);
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        let original = file.display_name();

        let Some(number) = current else {
            warn!("No sequence number left for {:?}", original);
            outcomes.push(RenameOutcome {
                step: RenameStep { original, target: String::new() },
                result: RenameResult::Failed {
                    error: format!("no sequence number left after {}", i64::MAX),
                },
            });
            continue;
        };

        let target = free_target(dir, &options.prefix, number, &file.extension(), ops);

        let result = match ops.rename(&file.path, &dir.join(&target)) {
            Ok(()) => {
                debug!("Renamed {:?} to {:?}", original, target);
                current = number.checked_add(1);
                RenameResult::Renamed
            }
            Err(e) => {
                warn!("Error renaming {:?}: {}", original, e);
                RenameResult::Failed { error: e.to_string() }
            }
        };

        outcomes.push(RenameOutcome {
            step: RenameStep { original, target },
            result,
        });
    }

    let report = RenameReport {
        outcomes,
        next_number: current,
    };
    info!("Rename finished: {} renamed, {} failed", report.renamed(), report.failed());
    Ok(report)
}

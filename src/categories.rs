// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Extension-based category table

use std::collections::HashSet;

use crate::config::{AppConfig, CategoryConfig};
use crate::{Result, TidyError};

/// Name of the fallback folder in the built-in table
pub const DEFAULT_FALLBACK: &str = "Others";

/// A named bucket of lowercase, dot-prefixed extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: HashSet<String>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    /// Extensions in sorted order, for display
    pub fn sorted_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

/// Where a file belongs according to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// First declared category containing the extension
    Category(&'a str),
    /// Non-empty extension that no category claims
    Fallback(&'a str),
    /// No extension; the file is left where it is
    Unclassified,
}

impl<'a> Classification<'a> {
    /// Destination folder name, if the file should move
    pub fn folder(&self) -> Option<&'a str> {
        match *self {
            Classification::Category(name) | Classification::Fallback(name) => Some(name),
            Classification::Unclassified => None,
        }
    }
}

/// Ordered, immutable category table.
///
/// Built once at startup and passed by reference to the organizer. Lookup is a
/// first-match search in declaration order, so overlapping extension sets are
/// resolved in favour of the earlier category.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    fallback: String,
}

impl CategoryTable {
    /// Build a table from configuration, validating names and normalizing extensions
    pub fn new(categories: &[CategoryConfig], fallback: &str) -> Result<Self> {
        validate_folder_name(fallback)?;

        let mut seen = HashSet::new();
        let mut built = Vec::with_capacity(categories.len());

        for cat in categories {
            validate_folder_name(&cat.name)?;
            if cat.name == fallback {
                return Err(TidyError::Config(format!(
                    "Category '{}' has the same name as the fallback category",
                    cat.name
                )));
            }
            if !seen.insert(cat.name.as_str()) {
                return Err(TidyError::Config(format!("Duplicate category '{}'", cat.name)));
            }

            let extensions = cat
                .extensions
                .iter()
                .filter_map(|e| normalize_extension(e))
                .collect();

            built.push(Category {
                name: cat.name.clone(),
                extensions,
            });
        }

        Ok(Self {
            categories: built,
            fallback: fallback.to_string(),
        })
    }

    /// Table from the `categories` and `fallback_category` settings
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.categories, &config.fallback_category)
    }

    /// The built-in table
    pub fn builtin() -> Self {
        let categories = builtin_categories()
            .into_iter()
            .map(|c| Category {
                name: c.name,
                extensions: c.extensions.into_iter().collect(),
            })
            .collect();

        Self {
            categories,
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }

    /// Classify a lowercase extension (including the dot, empty if none)
    pub fn classify(&self, extension: &str) -> Classification<'_> {
        if extension.is_empty() {
            return Classification::Unclassified;
        }

        self.categories
            .iter()
            .find(|c| c.contains(extension))
            .map(|c| Classification::Category(c.name()))
            .unwrap_or(Classification::Fallback(&self.fallback))
    }

    /// Declared categories, in order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Every folder the organizer creates: declared categories, then the fallback
    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(Category::name)
            .chain(std::iter::once(self.fallback.as_str()))
    }
}

/// Lowercased extension of a file name, including the leading dot.
///
/// The extension starts at the last `.`; leading dots belong to the stem, so
/// `.bashrc` has no extension while `archive.tar.gz` yields `.gz` and `notes.`
/// yields `.`.
pub fn lowercase_extension(file_name: &str) -> String {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name.rfind('.') {
        Some(idx) if idx > stem_start => file_name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// The default table, as configuration
pub fn builtin_categories() -> Vec<CategoryConfig> {
    let table: [(&str, &[&str]); 6] = [
        ("Images", &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp"]),
        (
            "Documents",
            &[".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx"],
        ),
        ("Videos", &[".mp4", ".mov", ".avi", ".mkv", ".flv"]),
        ("Audio", &[".mp3", ".wav", ".ogg", ".flac"]),
        ("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
        ("Code", &[".py", ".js", ".html", ".css", ".java", ".c", ".cpp", ".cs", ".json"]),
    ];

    table
        .iter()
        .map(|(name, exts)| CategoryConfig {
            name: name.to_string(),
            extensions: exts.iter().map(|e| e.to_string()).collect(),
        })
        .collect()
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

fn validate_folder_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TidyError::Config("Category name must not be empty".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(TidyError::Config(format!(
            "Category name '{}' is not a plain folder name",
            name
        )));
    }
    Ok(())
}

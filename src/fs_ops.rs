// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filesystem backends used by the organizer and renamer
//!
//! Directory listing always reads the real disk. Mutations and existence
//! checks go through [`FileOps`], so a run can be simulated with [`DryRunFs`]
//! or made to fail on purpose in tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Mutating filesystem operations
pub trait FileOps {
    /// Create a directory and its parents; succeeds if it already exists
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Move a file, falling back to copy-then-delete when a plain rename fails
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Rename within one directory
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;
}

/// Operations applied to the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileOps for RealFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            // Cross-device moves cannot be renamed in place
            Err(rename_err) if from.is_file() && !to.exists() => {
                tracing::debug!("Rename failed ({}), copying {:?} instead", rename_err, from);
                copy_then_remove(from, to).map_err(|_| rename_err)
            }
            Err(rename_err) => Err(rename_err),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Copy `from` to `to`, then delete `from`.
///
/// If the source cannot be deleted the copy is removed again, so the file
/// ends up in exactly one place.
pub fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}

/// Simulated filesystem for dry runs.
///
/// Starts from the real disk state and records every change in memory, so
/// later existence checks in the same run observe earlier simulated moves.
#[derive(Debug, Default)]
pub struct DryRunFs {
    added: RefCell<HashSet<PathBuf>>,
    removed: RefCell<HashSet<PathBuf>>,
}

impl DryRunFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        if !self.exists(from) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", from.display()),
            ));
        }
        let mut added = self.added.borrow_mut();
        let mut removed = self.removed.borrow_mut();
        added.remove(from);
        removed.insert(from.to_path_buf());
        removed.remove(to);
        added.insert(to.to_path_buf());
        Ok(())
    }
}

impl FileOps for DryRunFs {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if !self.exists(path) {
            self.removed.borrow_mut().remove(path);
            self.added.borrow_mut().insert(path.to_path_buf());
        }
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.relocate(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.relocate(from, to)
    }

    fn exists(&self, path: &Path) -> bool {
        if self.added.borrow().contains(path) {
            return true;
        }
        if self.removed.borrow().contains(path) {
            return false;
        }
        path.exists()
    }
}

/// One immediate child of a directory
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub file_name: OsString,
    pub is_dir: bool,
    pub is_file: bool,
}

impl Entry {
    /// File name for messages; invalid UTF-8 is replaced
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().into_owned()
    }

    /// Lowercased extension, taken from the lossy name so that a name with
    /// invalid UTF-8 in its stem still classifies by its extension
    pub fn extension(&self) -> String {
        crate::categories::lowercase_extension(&self.file_name.to_string_lossy())
    }
}

/// List the immediate children of `dir`, sorted by file name.
///
/// `is_dir`/`is_file` follow symlinks. Names are kept as raw `OsString`s, so
/// files whose names are not valid UTF-8 are listed too.
pub fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        entries.push(Entry {
            is_dir: path.is_dir(),
            is_file: path.is_file(),
            file_name: entry.file_name(),
            path,
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_entries_sorted_with_kinds() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.png"), "a").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let entries = list_entries(tmp.path()).unwrap();
        let names: Vec<String> = entries.iter().map(Entry::display_name).collect();
        assert_eq!(names, vec!["a.png", "b.txt", "sub"]);
        assert!(entries[0].is_file && !entries[0].is_dir);
        assert!(entries[2].is_dir && !entries[2].is_file);
    }

    #[test]
    fn test_real_move_file() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        let dst_dir = tmp.path().join("Documents");
        fs::write(&src, "hello").unwrap();
        RealFs.create_dir_all(&dst_dir).unwrap();
        RealFs.create_dir_all(&dst_dir).unwrap();

        RealFs.move_file(&src, &dst_dir.join("a.txt")).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst_dir.join("a.txt")).unwrap(), "hello");
    }

    #[test]
    fn test_copy_then_remove_moves_contents() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("clip.mkv");
        let dst = tmp.path().join("moved.mkv");
        fs::write(&src, "frames").unwrap();

        copy_then_remove(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "frames");
    }

    #[test]
    fn test_copy_then_remove_missing_source_leaves_nothing() {
        let tmp = TempDir::new().unwrap();
        let dst = tmp.path().join("out.txt");

        assert!(copy_then_remove(&tmp.path().join("gone.txt"), &dst).is_err());
        assert!(!dst.exists());
    }

    #[test]
    fn test_failed_move_keeps_source_in_place() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        let blocker = tmp.path().join("blocker");
        fs::write(&src, "keep").unwrap();
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("inside"), "x").unwrap();

        // Renaming a file onto a non-empty directory fails and no copy is attempted
        assert!(RealFs.move_file(&src, &blocker).is_err());
        assert_eq!(fs::read_to_string(&src).unwrap(), "keep");
        assert!(blocker.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_lists_names_that_are_not_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let name = std::ffi::OsStr::from_bytes(b"caf\xe9.PNG");
        fs::write(tmp.path().join(name), "x").unwrap();

        let entries = list_entries(tmp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, name);
        assert_eq!(entries[0].extension(), ".png");
        assert!(entries[0].display_name().ends_with(".PNG"));
    }

    #[test]
    fn test_dry_run_tracks_changes_without_touching_disk() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("f_1.txt");
        fs::write(&src, "x").unwrap();

        let dry = DryRunFs::new();
        dry.rename(&src, &dst).unwrap();

        assert!(!dry.exists(&src));
        assert!(dry.exists(&dst));
        assert!(src.exists());
        assert!(!dst.exists());

        dry.create_dir_all(&tmp.path().join("Images")).unwrap();
        assert!(dry.exists(&tmp.path().join("Images")));
        assert!(!tmp.path().join("Images").exists());
    }

    #[test]
    fn test_dry_run_rejects_missing_source() {
        let tmp = TempDir::new().unwrap();
        let dry = DryRunFs::new();
        let err = dry
            .rename(&tmp.path().join("nope"), &tmp.path().join("x"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

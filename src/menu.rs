// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Interactive menu
//!
//! A small state machine over line-based input. Operation failures are
//! printed and the menu comes back; only `3` or end of input leave it.

use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::categories::CategoryTable;
use crate::config::RenameConfig;
use crate::fs_ops::FileOps;
use crate::organizer::organize;
use crate::paths::expand_tilde;
use crate::renamer::{rename_sequential, RenameOptions};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    AwaitingChoice,
    RunningOrganize,
    RunningRename,
    Exited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Organize,
    Rename,
    Exit,
    Invalid(String),
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::Organize,
            "2" => MenuChoice::Rename,
            "3" => MenuChoice::Exit,
            other => MenuChoice::Invalid(other.to_string()),
        }
    }

    /// State entered after this choice is read
    pub fn next_state(&self) -> MenuState {
        match self {
            MenuChoice::Organize => MenuState::RunningOrganize,
            MenuChoice::Rename => MenuState::RunningRename,
            MenuChoice::Exit => MenuState::Exited,
            MenuChoice::Invalid(_) => MenuState::AwaitingChoice,
        }
    }
}

/// What the user typed at the starting-number prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartInput {
    Number(i64),
    Invalid,
    OutOfRange,
}

pub fn parse_start_number(input: &str) -> StartInput {
    match input.trim().parse::<i64>() {
        Ok(n) => StartInput::Number(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => StartInput::OutOfRange,
            _ => StartInput::Invalid,
        },
    }
}

pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    table: &'a CategoryTable,
    rename_defaults: &'a RenameConfig,
    ops: &'a dyn FileOps,
    directory: Option<PathBuf>,
    state: MenuState,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        table: &'a CategoryTable,
        rename_defaults: &'a RenameConfig,
        ops: &'a dyn FileOps,
    ) -> Self {
        Self {
            input,
            output,
            table,
            rename_defaults,
            ops,
            directory: None,
            state: MenuState::AwaitingChoice,
        }
    }

    /// Use this directory instead of asking for one
    pub fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- tidyup: File Organizer & Renamer ---")?;

        let directory = match self.directory.take() {
            Some(dir) => dir,
            None => {
                let Some(line) = self.prompt(
                    "Enter the directory path to operate on \
                     (e.g., /sdcard/Download or ~/storage/shared/my_test_folder): ",
                )?
                else {
                    self.state = MenuState::Exited;
                    return Ok(());
                };
                match expand_tilde(&line) {
                    Ok(dir) => dir,
                    Err(e) => {
                        writeln!(self.output, "Error: {}", e)?;
                        PathBuf::from(line.trim())
                    }
                }
            }
        };

        while self.state != MenuState::Exited {
            self.state = self.step(&directory)?;
            debug!("Menu state: {:?}", self.state);
        }
        Ok(())
    }

    fn step(&mut self, directory: &Path) -> Result<MenuState> {
        match self.state {
            MenuState::AwaitingChoice => {
                writeln!(self.output, "\nChoose an action:")?;
                writeln!(self.output, "1. Organize files by type (creates subfolders)")?;
                writeln!(self.output, "2. Rename files sequentially (adds prefix + number)")?;
                writeln!(self.output, "3. Exit")?;

                let choice = match self.prompt("Enter your choice (1/2/3): ")? {
                    Some(line) => MenuChoice::parse(&line),
                    None => MenuChoice::Exit,
                };
                match &choice {
                    MenuChoice::Exit => writeln!(self.output, "Exiting. Goodbye!")?,
                    MenuChoice::Invalid(_) => {
                        writeln!(self.output, "Invalid choice. Please enter 1, 2, or 3.")?
                    }
                    _ => {}
                }
                Ok(choice.next_state())
            }
            MenuState::RunningOrganize => {
                self.run_organize(directory)?;
                Ok(MenuState::AwaitingChoice)
            }
            MenuState::RunningRename => self.run_rename(directory),
            MenuState::Exited => Ok(MenuState::Exited),
        }
    }

    fn run_organize(&mut self, directory: &Path) -> Result<()> {
        match organize(directory, self.table, self.ops) {
            Ok(report) => {
                writeln!(self.output, "\n--- Organizing files in: {} ---", directory.display())?;
                for outcome in &report.outcomes {
                    writeln!(self.output, "{}", outcome)?;
                }
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    /// Ask for prefix and start, then rename. End of input at either prompt
    /// leaves the menu without touching the directory.
    fn run_rename(&mut self, directory: &Path) -> Result<MenuState> {
        let Some(prefix) = self.prompt("Enter the new file prefix (e.g., 'myphoto_'): ")? else {
            return self.exit_on_end_of_input();
        };
        let prefix = if prefix.trim().is_empty() {
            let fallback = self.rename_defaults.prefix.clone();
            writeln!(self.output, "Empty prefix. Using '{}'.", fallback)?;
            fallback
        } else {
            prefix
        };

        let Some(raw) = self.prompt("Enter the starting number for sequential naming (e.g., 1): ")?
        else {
            return self.exit_on_end_of_input();
        };
        let fallback = self.rename_defaults.start;
        let start = match parse_start_number(&raw) {
            StartInput::Number(n) => n,
            StartInput::Invalid => {
                writeln!(self.output, "Invalid starting number. Using {}.", fallback)?;
                fallback
            }
            StartInput::OutOfRange => {
                writeln!(
                    self.output,
                    "Starting number out of range (at most {}). Using {}.",
                    i64::MAX,
                    fallback
                )?;
                fallback
            }
        };

        let options = RenameOptions { prefix, start };
        match rename_sequential(directory, &options, self.ops) {
            Ok(report) => {
                writeln!(self.output, "\n--- Renaming files in: {} ---", directory.display())?;
                for outcome in &report.outcomes {
                    writeln!(self.output, "{}", outcome)?;
                }
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(MenuState::AwaitingChoice)
    }

    fn exit_on_end_of_input(&mut self) -> Result<MenuState> {
        writeln!(self.output, "\nExiting. Goodbye!")?;
        Ok(MenuState::Exited)
    }

    /// Print a prompt and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::RealFs;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_menu(input: &str) -> (String, MenuState) {
        let table = CategoryTable::builtin();
        let defaults = RenameConfig::default();
        let mut out = Vec::new();
        let state = {
            let mut menu = Menu::new(Cursor::new(input.to_string()), &mut out, &table, &defaults, &RealFs);
            menu.run().unwrap();
            menu.state()
        };
        (String::from_utf8(out).unwrap(), state)
    }

    #[test]
    fn test_choice_transitions() {
        assert_eq!(MenuChoice::parse("1").next_state(), MenuState::RunningOrganize);
        assert_eq!(MenuChoice::parse(" 2\n").next_state(), MenuState::RunningRename);
        assert_eq!(MenuChoice::parse("3").next_state(), MenuState::Exited);
        assert_eq!(MenuChoice::parse("4"), MenuChoice::Invalid("4".to_string()));
        assert_eq!(MenuChoice::parse("").next_state(), MenuState::AwaitingChoice);
    }

    #[test]
    fn test_parse_start_number() {
        assert_eq!(parse_start_number("5"), StartInput::Number(5));
        assert_eq!(parse_start_number(" -3 "), StartInput::Number(-3));
        assert_eq!(parse_start_number("abc"), StartInput::Invalid);
        assert_eq!(parse_start_number(""), StartInput::Invalid);
        assert_eq!(parse_start_number("9223372036854775807"), StartInput::Number(i64::MAX));
        assert_eq!(parse_start_number("9223372036854775808"), StartInput::OutOfRange);
        assert_eq!(parse_start_number("-99999999999999999999"), StartInput::OutOfRange);
    }

    #[test]
    fn test_end_of_input_during_rename_prompts_changes_nothing() {
        for input in ["2\n", "2\nf_\n"] {
            let tmp = TempDir::new().unwrap();
            fs::write(tmp.path().join("holiday.png"), "x").unwrap();

            let table = CategoryTable::builtin();
            let defaults = RenameConfig::default();
            let mut out = Vec::new();
            let state = {
                let mut menu = Menu::new(Cursor::new(input), &mut out, &table, &defaults, &RealFs)
                    .with_directory(tmp.path().to_path_buf());
                menu.run().unwrap();
                menu.state()
            };

            let out = String::from_utf8(out).unwrap();
            assert_eq!(state, MenuState::Exited);
            assert!(tmp.path().join("holiday.png").is_file(), "input {:?}", input);
            assert!(!out.contains("Renamed"));
            assert!(!out.contains("Empty prefix"));
            assert!(out.ends_with("Exiting. Goodbye!\n"));
        }
    }

    #[test]
    fn test_out_of_range_start_falls_back() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.png"), "a").unwrap();

        let input = format!("{}\n2\nf_\n99999999999999999999\n3\n", tmp.path().display());
        let (out, _) = run_menu(&input);

        assert!(out.contains("Starting number out of range"));
        assert!(tmp.path().join("f_1.png").is_file());
    }

    #[test]
    fn test_organize_then_exit() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("photo.JPG"), "x").unwrap();

        let input = format!("{}\n1\n3\n", tmp.path().display());
        let (out, state) = run_menu(&input);

        assert_eq!(state, MenuState::Exited);
        assert!(out.contains("Moved 'photo.JPG' to 'Images'"));
        assert!(out.ends_with("Exiting. Goodbye!\n"));
        assert!(tmp.path().join("Images/photo.JPG").is_file());
    }

    #[test]
    fn test_rename_with_bad_number_falls_back() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.png"), "a").unwrap();

        let input = format!("{}\n2\nf_\nlots\n3\n", tmp.path().display());
        let (out, _) = run_menu(&input);

        assert!(out.contains("Invalid starting number. Using 1."));
        assert!(out.contains("Renamed 'a.png' to 'f_1.png'"));
        assert!(tmp.path().join("f_2.txt").is_file());
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let tmp = TempDir::new().unwrap();
        let input = format!("{}\n9\n3\n", tmp.path().display());
        let (out, state) = run_menu(&input);

        assert!(out.contains("Invalid choice. Please enter 1, 2, or 3."));
        assert_eq!(out.matches("Choose an action:").count(), 2);
        assert_eq!(state, MenuState::Exited);
    }

    #[test]
    fn test_bad_directory_returns_to_menu() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let input = format!("{}\n1\n2\np\n1\n3\n", missing.display());
        let (out, state) = run_menu(&input);

        assert_eq!(out.matches("not found or is not a directory").count(), 2);
        assert_eq!(state, MenuState::Exited);
        assert!(!missing.exists());
    }

    #[test]
    fn test_end_of_input_exits() {
        let tmp = TempDir::new().unwrap();
        let (_, state) = run_menu(&format!("{}\n", tmp.path().display()));
        assert_eq!(state, MenuState::Exited);

        let (_, state) = run_menu("");
        assert_eq!(state, MenuState::Exited);
    }

    #[test]
    fn test_empty_prefix_uses_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.png"), "a").unwrap();

        let table = CategoryTable::builtin();
        let defaults = RenameConfig::default();
        let mut out = Vec::new();
        Menu::new(Cursor::new("2\n\n4\n3\n"), &mut out, &table, &defaults, &RealFs)
            .with_directory(tmp.path().to_path_buf())
            .run()
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Empty prefix. Using 'file_'."));
        assert!(tmp.path().join("file_4.png").is_file());
    }
}

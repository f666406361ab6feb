// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! tidyup: File Organizer & Sequential Renamer
//!
//! Run without a subcommand for the interactive menu.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use tidyup::categories::CategoryTable;
use tidyup::config::AppConfig;
use tidyup::fs_ops::{DryRunFs, FileOps, RealFs};
use tidyup::menu::Menu;
use tidyup::organizer::organize;
use tidyup::paths::expand_tilde;
use tidyup::renamer::{rename_sequential, RenameOptions};
use tidyup::Result;

/// tidyup - sort files by type and rename them sequentially
#[derive(Parser, Debug)]
#[command(name = "tidyup")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Sort files into category folders and rename them sequentially", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "tidyup.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Move files into category folders by extension
    Organize {
        /// Directory to organize (a leading ~ is expanded)
        dir: String,

        /// Show what would move without touching the disk
        #[arg(long)]
        dry_run: bool,
    },

    /// Rename files to <prefix><number><ext>
    Rename {
        /// Directory whose files are renamed (a leading ~ is expanded)
        dir: String,

        /// Name prefix (defaults to the configured prefix)
        #[arg(short, long)]
        prefix: Option<String>,

        /// First sequence number (defaults to the configured start)
        #[arg(short, long, allow_hyphen_values = true)]
        start: Option<i64>,

        /// Show the new names without renaming
        #[arg(long)]
        dry_run: bool,
    },

    /// List categories and their extensions
    Categories,

    /// Interactive menu (the default)
    Menu {
        /// Directory to operate on; asked for when omitted
        dir: Option<String>,

        /// Simulate every operation
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "tidyup.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration file
    Validate,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level(&cli)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Organize { dir, dry_run }) => {
            run_organize(&config, &dir, dry_run, &cli.format, cli.quiet)
        }
        Some(Commands::Rename { dir, prefix, start, dry_run }) => {
            let options = RenameOptions {
                prefix: prefix.unwrap_or_else(|| config.rename.prefix.clone()),
                start: start.unwrap_or(config.rename.start),
            };
            run_rename(&dir, &options, dry_run, &cli.format, cli.quiet)
        }
        Some(Commands::Categories) => run_categories(&config, &cli.format),
        Some(Commands::Menu { dir, dry_run }) => run_menu(&config, dir, dry_run),
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
        None => run_menu(&config, None, false),
    }
}

/// Log level from the verbosity flags (quiet keeps errors only)
fn log_level(cli: &Cli) -> &'static str {
    if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

fn select_ops(dry_run: bool) -> Box<dyn FileOps> {
    if dry_run {
        warn!("DRY RUN MODE - nothing on disk will change");
        Box::new(DryRunFs::new())
    } else {
        Box::new(RealFs)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the organizer once
fn run_organize(config: &AppConfig, dir: &str, dry_run: bool, format: &str, quiet: bool) -> Result<()> {
    let table = CategoryTable::from_config(config)?;
    let dir = expand_tilde(dir)?;
    let ops = select_ops(dry_run);

    let report = organize(&dir, &table, ops.as_ref())?;

    if format == "json" {
        return print_json(&report);
    }

    let marker = if dry_run { "[DRY RUN] " } else { "" };
    for outcome in &report.outcomes {
        println!("{}{}", marker, outcome);
    }
    if !quiet {
        println!(
            "\nDone. {} moved, {} failed, {} left in place.",
            report.moved(),
            report.failed(),
            report.skipped()
        );
    }
    Ok(())
}

/// Run the sequential renamer once
fn run_rename(dir: &str, options: &RenameOptions, dry_run: bool, format: &str, quiet: bool) -> Result<()> {
    let dir = expand_tilde(dir)?;
    let ops = select_ops(dry_run);

    let report = rename_sequential(&dir, options, ops.as_ref())?;

    if format == "json" {
        return print_json(&report);
    }

    let marker = if dry_run { "[DRY RUN] " } else { "" };
    for outcome in &report.outcomes {
        println!("{}{}", marker, outcome);
    }
    if !quiet {
        println!("\nDone. {} renamed, {} failed.", report.renamed(), report.failed());
    }
    Ok(())
}

/// Print the category table in match order
fn run_categories(config: &AppConfig, format: &str) -> Result<()> {
    let table = CategoryTable::from_config(config)?;

    if format == "json" {
        let rows: Vec<serde_json::Value> = table
            .categories()
            .iter()
            .map(|c| serde_json::json!({ "name": c.name(), "extensions": c.sorted_extensions() }))
            .collect();
        return print_json(&serde_json::json!({
            "categories": rows,
            "fallback": table.fallback(),
        }));
    }

    println!("Categories (first match wins):");
    for cat in table.categories() {
        println!("  {:<10} {}", cat.name(), cat.sorted_extensions().join(" "));
    }
    println!("  {:<10} (any other extension)", table.fallback());
    Ok(())
}

/// Run the interactive menu on stdin/stdout
fn run_menu(config: &AppConfig, dir: Option<String>, dry_run: bool) -> Result<()> {
    let table = CategoryTable::from_config(config)?;
    let ops = select_ops(dry_run);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), &table, &config.rename, ops.as_ref());
    if let Some(dir) = dir {
        menu = menu.with_directory(expand_tilde(&dir)?);
    }

    menu.run()?;
    info!("Menu exited");
    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output, force } => {
            if output.exists() && !force {
                return Err(tidyup::TidyError::Config(format!(
                    "{} already exists. Use --force to overwrite",
                    output.display()
                )));
            }
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Categories: {}", config.categories.len());
            println!("  Fallback: {}", config.fallback_category);
            println!("  Rename defaults: prefix '{}', start {}", config.rename.prefix, config.rename.start);
        }
    }

    Ok(())
}

//! Query the course catalog from the command line.
//!
//! Loads the bundled catalog (or `--catalog PATH` / `COURSE_CATALOG_PATH`),
//! runs one query, and prints the result as pretty JSON on stdout. Logging
//! goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use coursemap::{
    CATALOG_PATH_ENV, CatalogSource, CourseId, CourseIndex, LoadOptions, ProgressSummary,
    ValidationMode, build_skill_coverage_map, resolve_catalog_source,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for `find` when the id is not in the catalog.
const NOT_FOUND_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "course-query", version, about = "Query the course/skill catalog")]
struct Cli {
    /// Catalog file to load instead of the bundled one.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Validate a --catalog file against this JSON Schema instead of the bundled one.
    #[arg(long, value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Fail on convention violations (grade or progress on the wrong status).
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Completed courses in catalog order.
    Completed,
    /// Courses currently in progress.
    InProgress,
    /// Planned courses.
    Planned,
    /// Look up one course by id.
    Find { id: String },
    /// Skills unlocked by completed courses.
    Skills,
    /// Skills the in-progress courses will unlock.
    SkillsInProgress,
    /// Credit and skill rollup.
    Summary,
    /// Skill to course mapping.
    Coverage,
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mode = if cli.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Lenient
    };

    let loaded;
    let index: &CourseIndex = match resolve_catalog_source(cli.catalog.as_deref()) {
        CatalogSource::Bundled => {
            if cli.schema.is_some() {
                bail!("--schema requires --catalog or {CATALOG_PATH_ENV}");
            }
            CourseIndex::bundled()?
        }
        CatalogSource::File(path) => {
            tracing::info!(path = %path.display(), "loading course catalog");
            loaded = CourseIndex::load_with(
                &path,
                LoadOptions {
                    schema_path: cli.schema.as_deref(),
                    mode,
                },
            )?;
            &loaded
        }
    };

    match cli.command {
        Command::Completed => print_json(&index.completed())?,
        Command::InProgress => print_json(&index.in_progress())?,
        Command::Planned => print_json(&index.planned())?,
        Command::Find { id } => {
            let found = index.course(&CourseId::new(id));
            print_json(&found)?;
            if found.is_none() {
                return Ok(ExitCode::from(NOT_FOUND_EXIT));
            }
        }
        Command::Skills => print_json(&index.unlocked_skills())?,
        Command::SkillsInProgress => print_json(&index.skills_in_progress())?,
        Command::Summary => print_json(&ProgressSummary::from_index(index))?,
        Command::Coverage => print_json(&build_skill_coverage_map(index))?,
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

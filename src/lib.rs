//! Shared library for the coursemap catalog.
//!
//! The crate exposes the course catalog types, the validated `CourseIndex`
//! with its status and skill queries, and progress rollups derived from it.
//! The `course-query` binary is a thin JSON front end over these functions.

use std::env;
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod progress;
mod schema_loader;

pub use catalog::{
    CatalogKey, CatalogMetadata, CourseCatalog, CourseId, CourseIndex, CourseRecord, CourseStatus,
    LoadOptions, MAX_COURSE_CREDITS, SkillTag, ValidationMode, load_catalog_from_path,
    parse_catalog,
};
pub use progress::{
    ProgressSummary, SkillCoverage, StatusTally, build_skill_coverage_map, pending_skills,
};

/// Environment variable naming a catalog file to use instead of the bundled one.
pub const CATALOG_PATH_ENV: &str = "COURSE_CATALOG_PATH";

/// Where the catalog for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

/// Pick the catalog source: explicit override first, then
/// `COURSE_CATALOG_PATH`, then the bundled data.
///
/// An empty or whitespace-only environment value counts as unset.
pub fn resolve_catalog_source(cli_override: Option<&Path>) -> CatalogSource {
    if let Some(path) = cli_override {
        return CatalogSource::File(path.to_path_buf());
    }
    source_from_env_value(env::var(CATALOG_PATH_ENV).ok().as_deref())
}

fn source_from_env_value(value: Option<&str>) -> CatalogSource {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => CatalogSource::File(PathBuf::from(raw)),
        _ => CatalogSource::Bundled,
    }
}

//! Deserializable representation of a course catalog file.
//!
//! The types mirror `schema/course_catalog.schema.json`. Record fields keep the
//! camelCase names used by the authored data (`skillsUnlocked`,
//! `progressPercent`). Use `CourseIndex` for validation and queries; these
//! structs are the raw, unvalidated shape.

use crate::catalog::identity::{CatalogKey, CourseId, CourseStatus, SkillTag};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Full course catalog as stored on disk.
pub struct CourseCatalog {
    pub schema_version: String,
    pub catalog: CatalogMetadata,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Identifying metadata for one catalog snapshot.
pub struct CatalogMetadata {
    pub key: CatalogKey,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One academic course and the skills it confers.
pub struct CourseRecord {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub semester: String,
    pub credits: u32,
    #[serde(default)]
    pub grade: Option<String>,
    pub status: CourseStatus,
    #[serde(default)]
    pub skills_unlocked: Vec<SkillTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,
}

impl CourseRecord {
    pub fn is(&self, status: CourseStatus) -> bool {
        self.status == status
    }

    /// True when the course lists `tag` among its unlocked skills.
    pub fn unlocks(&self, tag: &SkillTag) -> bool {
        self.skills_unlocked.contains(tag)
    }
}

/// Read and parse a course catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<CourseCatalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_catalog(&data).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_catalog(data: &str) -> Result<CourseCatalog> {
    let catalog: CourseCatalog = serde_json::from_str(data)?;
    Ok(catalog)
}

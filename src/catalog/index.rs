//! Indexed, validated view of a course catalog.
//!
//! The index enforces the catalog schema version, rejects duplicate or blank
//! course ids and malformed records, and answers the read-only queries the
//! presentation layer needs. Once built it never changes, so every query is a
//! total function over the same records.

use crate::catalog::model::parse_catalog;
use crate::catalog::{
    CatalogKey, CatalogMetadata, CourseCatalog, CourseId, CourseRecord, CourseStatus, SkillTag,
};
use crate::schema_loader::{
    SchemaLoadOptions, SchemaLoadResult, load_bundled_schema, load_json_schema, validate_instance,
};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

// Only one catalog layout exists; reject other versions rather than guess at
// field meanings.
const DEFAULT_SCHEMA_VERSION: &str = "course_catalog_v1";

/// Upper bound on credit hours for a single course; matches the schema.
pub const MAX_COURSE_CREDITS: u32 = 24;

const BUNDLED_CATALOG: &str = include_str!("../../catalogs/courses.json");

/// How convention violations are treated while building an index.
///
/// Structural problems (duplicate ids, credits outside 1..=24, out-of-range progress)
/// always fail. Conventions are softer: a grade on a course that is not
/// completed, or a progress value on a course that is not in progress.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ValidationMode {
    /// Log convention violations with `tracing::warn!` and keep going.
    #[default]
    Lenient,
    /// Treat convention violations as load errors.
    Strict,
}

#[derive(Clone, Copy, Debug, Default)]
/// Knobs for [`CourseIndex::load_with`].
pub struct LoadOptions<'a> {
    /// Validate against this schema instead of the one compiled into the crate.
    pub schema_path: Option<&'a Path>,
    pub mode: ValidationMode,
}

#[derive(Debug)]
/// Course catalog plus a derived index keyed by course id.
pub struct CourseIndex {
    catalog: CourseCatalog,
    by_id: BTreeMap<CourseId, usize>,
}

impl CourseIndex {
    /// Load and validate a catalog from disk with default options.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, LoadOptions::default())
    }

    /// Load a catalog, validate it against the JSON Schema, then apply the
    /// semantic checks of [`CourseIndex::from_catalog_with`].
    pub fn load_with(path: &Path, options: LoadOptions<'_>) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing catalog {}", path.display()))?;

        let label = format!("course catalog {}", path.display());
        let schema = resolve_schema(&value, options.schema_path)?;
        validate_instance(&schema, &value, &label)?;

        let catalog: CourseCatalog =
            serde_json::from_value(value).with_context(|| format!("decoding {label}"))?;
        Self::from_catalog_with(catalog, options.mode)
            .with_context(|| format!("validating {label}"))
    }

    /// Build an index from an in-memory catalog using lenient validation.
    pub fn from_catalog(catalog: CourseCatalog) -> Result<Self> {
        Self::from_catalog_with(catalog, ValidationMode::Lenient)
    }

    pub fn from_catalog_with(catalog: CourseCatalog, mode: ValidationMode) -> Result<Self> {
        validate_schema_version(&catalog.schema_version)?;
        validate_catalog_metadata(&catalog.catalog)?;
        let by_id = build_index(&catalog)?;
        check_conventions(&catalog, mode)?;
        tracing::debug!(
            key = %catalog.catalog.key.0,
            courses = catalog.courses.len(),
            "indexed course catalog"
        );
        Ok(Self { catalog, by_id })
    }

    /// The personal course list compiled into the crate.
    ///
    /// Built once on first use and shared for the rest of the process.
    pub fn bundled() -> Result<&'static CourseIndex> {
        static BUNDLED: OnceLock<Result<CourseIndex, String>> = OnceLock::new();
        BUNDLED
            .get_or_init(|| load_bundled().map_err(|err| format!("{err:#}")))
            .as_ref()
            .map_err(|msg| anyhow!("bundled course catalog is invalid: {msg}"))
    }

    /// The catalog key declared in the loaded file.
    pub fn key(&self) -> &CatalogKey {
        &self.catalog.catalog.key
    }

    /// Access the underlying catalog (metadata and raw records).
    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// Every record in authored order.
    pub fn courses(&self) -> &[CourseRecord] {
        &self.catalog.courses
    }

    pub fn len(&self) -> usize {
        self.catalog.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.courses.is_empty()
    }

    /// Iterates course ids in authored order.
    pub fn ids(&self) -> impl Iterator<Item = &CourseId> {
        self.catalog.courses.iter().map(|course| &course.id)
    }

    /// Resolve a course by id.
    ///
    /// Unknown ids are an ordinary outcome and yield `None`.
    pub fn course(&self, id: &CourseId) -> Option<&CourseRecord> {
        self.by_id.get(id).map(|&idx| &self.catalog.courses[idx])
    }

    /// Records with the given status, in authored order.
    pub fn with_status(&self, status: CourseStatus) -> Vec<&CourseRecord> {
        self.catalog
            .courses
            .iter()
            .filter(|course| course.is(status))
            .collect()
    }

    pub fn completed(&self) -> Vec<&CourseRecord> {
        self.with_status(CourseStatus::Completed)
    }

    pub fn in_progress(&self) -> Vec<&CourseRecord> {
        self.with_status(CourseStatus::InProgress)
    }

    pub fn planned(&self) -> Vec<&CourseRecord> {
        self.with_status(CourseStatus::Planned)
    }

    /// Distinct skill tags conferred by courses with `status`.
    ///
    /// Tags are compared by exact string equality and returned in the order
    /// they are first seen.
    pub fn skills_for(&self, status: CourseStatus) -> Vec<&SkillTag> {
        let mut seen: BTreeSet<&SkillTag> = BTreeSet::new();
        let mut skills = Vec::new();
        for course in self.catalog.courses.iter().filter(|c| c.is(status)) {
            for skill in &course.skills_unlocked {
                if seen.insert(skill) {
                    skills.push(skill);
                }
            }
        }
        skills
    }

    /// Skills already unlocked by completed courses.
    pub fn unlocked_skills(&self) -> Vec<&SkillTag> {
        self.skills_for(CourseStatus::Completed)
    }

    /// Skills that the current term's courses will unlock.
    pub fn skills_in_progress(&self) -> Vec<&SkillTag> {
        self.skills_for(CourseStatus::InProgress)
    }
}

fn load_bundled() -> Result<CourseIndex> {
    let value: Value =
        serde_json::from_str(BUNDLED_CATALOG).context("parsing bundled course catalog")?;
    let schema = load_bundled_schema(SchemaLoadOptions {
        allowed_versions: Some(&allowed_schema_versions()),
        ..Default::default()
    })?;
    validate_instance(&schema, &value, "bundled course catalog")?;
    let catalog = parse_catalog(BUNDLED_CATALOG)?;
    CourseIndex::from_catalog_with(catalog, ValidationMode::Strict)
}

fn resolve_schema(catalog_value: &Value, schema_path: Option<&Path>) -> Result<SchemaLoadResult> {
    let allowed = allowed_schema_versions();
    match schema_path {
        Some(path) => {
            let catalog_version = catalog_value
                .get("schema_version")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            load_json_schema(
                path,
                SchemaLoadOptions {
                    allowed_versions: Some(&allowed),
                    expected_version: Some(&catalog_version),
                    patch_schema_version_const: true,
                    ..Default::default()
                },
            )
            .with_context(|| format!("loading catalog schema {}", path.display()))
        }
        None => load_bundled_schema(SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        }),
    }
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([DEFAULT_SCHEMA_VERSION.to_string()])
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    Ok(())
}

fn validate_catalog_metadata(meta: &CatalogMetadata) -> Result<()> {
    validate_catalog_key(&meta.key)?;
    if meta.title.trim().is_empty() {
        bail!("catalog.title must not be empty");
    }
    Ok(())
}

fn validate_catalog_key(key: &CatalogKey) -> Result<()> {
    if key.0.is_empty() {
        bail!("catalog.key must not be empty");
    }

    if !key
        .0
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!("catalog.key must match ^[A-Za-z0-9_.-]+$, got {}", key.0);
    }

    Ok(())
}

fn build_index(catalog: &CourseCatalog) -> Result<BTreeMap<CourseId, usize>> {
    let mut map = BTreeMap::new();
    for (idx, course) in catalog.courses.iter().enumerate() {
        if course.id.0.trim().is_empty() {
            bail!("course at position {idx} has no id");
        }
        if map.contains_key(&course.id) {
            bail!("duplicate course id {}", course.id);
        }
        if course.credits == 0 {
            bail!("course {} must carry at least one credit", course.id);
        }
        if course.credits > MAX_COURSE_CREDITS {
            bail!(
                "course {} has {} credits; at most {MAX_COURSE_CREDITS} are allowed",
                course.id,
                course.credits
            );
        }
        if let Some(progress) = course.progress_percent {
            if !progress.is_finite() || !(0.0..=1.0).contains(&progress) {
                bail!(
                    "course {} has progressPercent {progress}; expected a value in [0.0, 1.0]",
                    course.id
                );
            }
        }

        let mut tags: BTreeSet<&SkillTag> = BTreeSet::new();
        for skill in &course.skills_unlocked {
            if skill.0.trim().is_empty() {
                bail!("course {} lists an empty skill tag", course.id);
            }
            if !tags.insert(skill) {
                bail!("course {} lists skill '{}' more than once", course.id, skill);
            }
        }

        map.insert(course.id.clone(), idx);
    }
    Ok(map)
}

fn check_conventions(catalog: &CourseCatalog, mode: ValidationMode) -> Result<()> {
    for course in &catalog.courses {
        let mut problems = Vec::new();
        if course.grade.is_some() && course.status != CourseStatus::Completed {
            problems.push(format!("has a grade but status is {}", course.status));
        }
        if course.progress_percent.is_some() && course.status != CourseStatus::InProgress {
            problems.push(format!("has progressPercent but status is {}", course.status));
        }

        for problem in problems {
            match mode {
                ValidationMode::Strict => bail!("course {} {problem}", course.id),
                ValidationMode::Lenient => {
                    tracing::warn!(course = %course.id, "course {problem}")
                }
            }
        }
    }
    Ok(())
}

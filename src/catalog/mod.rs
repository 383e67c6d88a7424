//! Course catalog wiring.
//!
//! This module wraps course catalogs (the bundled `catalogs/courses.json` or a
//! file supplied at runtime) so callers can load a validated snapshot and run
//! read-only queries over it. Types here mirror the schema fields; callers use
//! `CourseIndex` for lookups, status filters, and skill aggregation.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{CatalogKey, CourseId, CourseStatus, SkillTag};
pub use index::{CourseIndex, LoadOptions, MAX_COURSE_CREDITS, ValidationMode};
pub use model::{CatalogMetadata, CourseCatalog, CourseRecord};

pub use model::{load_catalog_from_path, parse_catalog};

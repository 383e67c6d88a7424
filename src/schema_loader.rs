//! JSON Schema loading for catalog files.
//!
//! Callers either use the schema compiled into the crate or point at a schema
//! on disk. Either way the `schema_version` const is checked against the
//! allowed set (and optionally patched to an expected version) before the
//! validator is compiled.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Canonical catalog schema shipped with the crate.
pub(crate) const BUNDLED_CATALOG_SCHEMA: &str =
    include_str!("../schema/course_catalog.schema.json");

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how schemas are normalized before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Override schema_version when provided (used to align consts).
    pub expected_version: Option<&'a str>,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
    /// Patch the schema_version const to match `expected_version`.
    pub patch_schema_version_const: bool,
}

impl Default for SchemaLoadOptions<'_> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            expected_version: None,
            allowed_versions: None,
            patch_schema_version_const: false,
        }
    }
}

/// Read a schema from disk and compile it.
pub(crate) fn load_json_schema(
    path: &Path,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let schema: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;
    compile_schema(schema, &path.display().to_string(), options)
}

/// Compile the schema embedded in the crate.
pub(crate) fn load_bundled_schema(options: SchemaLoadOptions<'_>) -> Result<SchemaLoadResult> {
    let schema: Value =
        serde_json::from_str(BUNDLED_CATALOG_SCHEMA).context("parsing bundled catalog schema")?;
    compile_schema(schema, "bundled catalog schema", options)
}

fn compile_schema(
    mut schema: Value,
    label: &str,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let schema_version = match options.expected_version {
        Some(version) => version.to_string(),
        None => extract_schema_version(&schema, options.schema_version_pointer)
            .ok_or_else(|| anyhow!("schema {label} missing schema_version const"))?,
    };

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    if options.patch_schema_version_const {
        let target = schema
            .pointer_mut(options.schema_version_pointer)
            .ok_or_else(|| {
                anyhow!(
                    "schema {label} missing pointer {} for schema_version const",
                    options.schema_version_pointer
                )
            })?;
        *target = Value::String(schema_version.clone());
    }

    // ValidationError borrows the schema, so only its message survives.
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `instance` and fold every schema violation into one error.
pub(crate) fn validate_instance(
    schema: &SchemaLoadResult,
    instance: &Value,
    label: &str,
) -> Result<()> {
    tracing::debug!(schema_version = %schema.schema_version, "validating {label}");
    if let Err(errors) = schema.compiled.validate(instance) {
        let details = errors
            .map(|err| format!("{}: {err}", err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn bundled_schema_compiles_with_its_own_version() {
        let loaded = load_bundled_schema(SchemaLoadOptions::default()).unwrap();
        assert_eq!(loaded.schema_version, "course_catalog_v1");
    }

    #[test]
    fn disallowed_version_is_rejected() {
        let allowed = BTreeSet::from(["other_v9".to_string()]);
        let err = load_bundled_schema(SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        })
        .err()
        .expect("version outside allowed set");
        assert!(err.to_string().contains("course_catalog_v1"));
    }

    #[test]
    fn patched_const_changes_accepted_version() {
        let loaded = load_bundled_schema(SchemaLoadOptions {
            expected_version: Some("course_catalog_v2"),
            patch_schema_version_const: true,
            ..Default::default()
        })
        .unwrap();
        let instance = json!({
            "schema_version": "course_catalog_v2",
            "catalog": {"key": "k", "title": "t"},
            "courses": []
        });
        validate_instance(&loaded, &instance, "fixture").unwrap();
    }

    #[test]
    fn schema_without_version_const_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json!({"type": "object"})).unwrap();
        let err = load_json_schema(file.path(), SchemaLoadOptions::default())
            .err()
            .expect("missing const");
        assert!(err.to_string().contains("schema_version const"));
    }

    #[test]
    fn validation_errors_name_the_instance_path() {
        let loaded = load_bundled_schema(SchemaLoadOptions::default()).unwrap();
        let instance = json!({
            "schema_version": "course_catalog_v1",
            "catalog": {"key": "k", "title": "t"},
            "courses": [{"id": "X-1"}]
        });
        let err = validate_instance(&loaded, &instance, "fixture").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("fixture failed schema validation"));
        assert!(message.contains("/courses/0"), "{message}");
    }
}

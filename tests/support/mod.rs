use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub fn course_query_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_course-query"))
}

/// `course-query` with the catalog override cleared so runs see the bundled data.
pub fn course_query() -> Command {
    let mut cmd = Command::new(course_query_binary());
    cmd.env_remove(coursemap::CATALOG_PATH_ENV);
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).context("stdout was not JSON")
}

pub fn course(id: &str, status: &str, skills: &[&str]) -> Value {
    json!({
        "id": id,
        "code": id.replace('-', " "),
        "name": format!("Fixture {id}"),
        "semester": "Fall 2026",
        "credits": 3,
        "grade": if status == "COMPLETED" { json!("A") } else { Value::Null },
        "status": status,
        "skillsUnlocked": skills,
    })
}

pub fn catalog_value(courses: Vec<Value>) -> Value {
    json!({
        "schema_version": "course_catalog_v1",
        "catalog": {"key": "fixture_v1", "title": "Fixture catalog"},
        "courses": courses,
    })
}

pub fn write_catalog(value: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate catalog file")?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.flush()?;
    Ok(file)
}

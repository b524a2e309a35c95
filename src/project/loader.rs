// src/project/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::project::model::Project;
use crate::project::validate::{ProjectWarning, validate_project};

/// Read a project snapshot from a JSON file.
///
/// Only deserializes; see [`load_and_validate`] for structural checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Project> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&contents)?;
    debug!(
        path = %path.display(),
        activities = project.activities.len(),
        "loaded project"
    );
    Ok(project)
}

/// Read a project and run [`validate_project`] on it.
pub fn load_and_validate(
    path: impl AsRef<Path>,
    cfg: &ConfigFile,
) -> Result<(Project, Vec<ProjectWarning>)> {
    let project = load_from_path(path)?;
    let warnings = validate_project(&project, cfg)?;
    Ok((project, warnings))
}

/// Write a project snapshot as pretty-printed JSON.
pub fn save_to_path(project: &Project, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(project)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "saved project");
    Ok(())
}

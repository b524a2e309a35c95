// src/errors.rs

//! Crate-wide error type.
//!
//! Rejected status changes and refused edits are ordinary values
//! ([`Rejection`], [`EditError`]); they convert into [`PertrackError`] only at
//! the CLI boundary.

use thiserror::Error;

use crate::dag::dates::ScheduleError;
use crate::dag::transition::Rejection;
use crate::project::edit::EditError;
use crate::types::ActivityId;

#[derive(Error, Debug)]
pub enum PertrackError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid project: {0}")]
    ProjectError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cycle detected in activity network at activity {0}")]
    Cycle(ActivityId),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PertrackError>;

impl From<ScheduleError> for PertrackError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Cycle(id) => PertrackError::Cycle(id),
        }
    }
}

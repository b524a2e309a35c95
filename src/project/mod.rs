// src/project/mod.rs

//! Project and activity data model.
//!
//! - [`model`] defines the exchanged project record.
//! - [`loader`] reads and writes it as JSON.
//! - [`validate`] checks structural invariants after loading.
//! - [`edit`] holds the copy-on-write edit operations.

pub mod edit;
pub mod loader;
pub mod model;
pub mod validate;

pub use edit::{
    EditError, ProjectDetails, delete_activity, new_project, next_activity_id, update_details,
    upsert_activity,
};
pub use loader::{load_and_validate, load_from_path, save_to_path};
pub use model::{Activity, Attachment, Comment, Project, Responsible, Timestamp};
pub use validate::{ProjectWarning, validate_project};

//! Data models for the JNLP deploy console.
//!
//! This crate provides the records exchanged with the deploy server
//! (projects, libraries, modules, icons) together with the client-side
//! types layered over them: per-field pending-change overlays and the
//! transient items of a bulk library upload.

pub mod error;
pub mod icons;
pub mod library;
pub mod naming;
pub mod overlay;
pub mod project;
pub mod timestamp;
pub mod upload;

// Re-export main types
pub use error::{ModelError, Result};
pub use icons::{IconKind, Icons};
pub use library::{Library, Module};
pub use naming::{format_bytes, parse_name_version, validate_project_name};
pub use overlay::{Blank, FieldState, LibraryOverlay};
pub use project::{DeployTask, Project, ProjectEntry, ADD_PROJECT_ROW};
pub use upload::{UploadItem, UploadStatus};

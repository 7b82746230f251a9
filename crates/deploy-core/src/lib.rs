//! Deploy Core - client logic of the JNLP deploy console.
//!
//! This crate drives the deploy server on behalf of a front end:
//!
//! - **config**: Environment-first client settings and local paths
//! - **gateway**: The [`DeployApi`] seam and its HTTP implementation
//! - **phrases**: Localized phrase table with key fallback
//! - **session**: Project record, origin and deploy task token
//! - **gate**: Toolbar availability derived from the deploy state
//! - **libraries**: Library grid with pending-change overlays
//! - **reorder**: Two-step library move protocol
//! - **upload**: Sequential bulk upload with retry / ignore / abort
//! - **controller**: Handlers tying the pieces together per project

pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod libraries;
pub mod lock;
pub mod phrases;
pub mod prompt;
pub mod reorder;
pub mod session;
pub mod upload;

// Re-export commonly used items for convenience
pub use config::{
    config_dir, default_locale, ensure_state_dir, env_file, history_file, state_dir, ClientConfig,
};
pub use controller::{list_projects, new_project_name, DeployController, LibraryChange};
pub use error::{DeployError, Result};
pub use gate::{ActionState, LibraryAction, LibraryToolbar, ProjectAction, ProjectStatus, ProjectToolbar};
pub use gateway::{DeployApi, HttpGateway};
pub use libraries::{GridRow, LibraryGrid, Selection};
pub use lock::{BusyGuard, BusyLock};
pub use phrases::PhraseBook;
pub use prompt::{Prompter, UploadDecision};
pub use reorder::{Direction, MovePlan};
pub use session::{DeploySession, TaskScope};
pub use upload::{UploadOutcome, UploadWorkflow};

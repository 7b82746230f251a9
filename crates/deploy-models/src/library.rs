//! Library and module records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A unit discovered inside a library artifact by the server.
///
/// Read-only from the console's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Fully qualified class name; identity of the module.
    pub class_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A jar library of a project (`_libs` / `_lib`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Library name, unique within the project.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Jar size in bytes.
    #[serde(default)]
    pub file_size: u64,

    /// Load order; zero means "not assigned yet".
    #[serde(default)]
    pub sequence: u32,

    /// Primary (entry) jar of the application.
    #[serde(default)]
    pub major: bool,

    #[serde(default)]
    pub disabled: bool,

    /// Marked for removal when the deploy is finished.
    #[serde(default)]
    pub deleted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,

    #[serde(
        default,
        with = "crate::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<NaiveDateTime>,

    /// Modules found in the jar; `None` when the response left them out.
    /// Never sent back to the server.
    #[serde(default, skip_serializing)]
    pub modules: Option<Vec<Module>>,
}

impl Library {
    /// Creates a library record with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Modules of the library, empty when unknown.
    pub fn modules(&self) -> &[Module] {
        self.modules.as_deref().unwrap_or_default()
    }

    /// Whether the server has assigned a load order yet.
    pub fn has_sequence(&self) -> bool {
        self.sequence > 0
    }
}

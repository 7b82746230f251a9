//! Project types for the deploy console.
//!
//! A project is one deployable JNLP application. The console edits exactly
//! one project at a time, inside a deploy task opened on the server.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic list row offering "deploy new project".
pub const ADD_PROJECT_ROW: &str = "$add";

/// Opaque correlation token of an open deploy task.
///
/// Sent back to the server in the `deployTask` header of every request
/// until the deploy is finished or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployTask(String);

impl DeployTask {
    /// Wraps a token returned by `_start`.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeployTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deployable project as returned by `_project`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project name; immutable once created.
    #[serde(default)]
    pub name: String,

    /// Application title shown by Java Web Start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Application version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Base class or interface modules extend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_base_class: Option<String>,

    /// Getter returning a module's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name_getter: Option<String>,

    /// Getter returning a module's version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_version_getter: Option<String>,

    #[serde(default)]
    pub disabled: bool,

    /// Marked for removal when the deploy is finished.
    #[serde(default)]
    pub deleted: bool,

    /// True until the first successful deploy.
    #[serde(default)]
    pub initial: bool,

    #[serde(
        default,
        with = "crate::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<NaiveDateTime>,
}

impl Project {
    /// Creates an empty project record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Display title, falling back to the name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Sets one editable text field by its wire name.
    ///
    /// Returns `false` for unknown or read-only fields (`name` included).
    /// An empty value clears the field.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        let value = (!value.is_empty()).then(|| value.to_string());
        match field {
            "title" => self.title = value,
            "version" => self.version = value,
            "moduleBaseClass" => self.module_base_class = value,
            "moduleNameGetter" => self.module_name_getter = value,
            "moduleVersionGetter" => self.module_version_getter = value,
            _ => return false,
        }
        true
    }

    /// Wire names accepted by [`Project::set_field`].
    pub const EDITABLE_FIELDS: &'static [&'static str] = &[
        "title",
        "version",
        "moduleBaseClass",
        "moduleNameGetter",
        "moduleVersionGetter",
    ];
}

/// A row of the project list (`_list`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(flatten)]
    pub project: Project,

    /// Whether the caller may deploy this project.
    #[serde(default)]
    pub deploy_allowed: bool,
}

impl ProjectEntry {
    /// True for the synthetic "deploy new project" row.
    pub fn is_add_row(&self) -> bool {
        self.project.name == ADD_PROJECT_ROW
    }
}

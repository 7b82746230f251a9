//! Deploy lifecycle gate.
//!
//! Which toolbar actions are available is a pure function of the deploy
//! state and the project flags (plus, for the library toolbar, the current
//! selection). The gate is recomputed from scratch after every response.

use std::fmt;

use deploy_models::{Library, Project};

/// Availability of one toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionState {
    pub enabled: bool,
    pub hidden: bool,
}

impl ActionState {
    fn new(disabled: bool, hidden: bool) -> Self {
        Self {
            enabled: !disabled,
            hidden,
        }
    }

    /// Visible and enabled.
    pub fn usable(&self) -> bool {
        self.enabled && !self.hidden
    }
}

/// Project toolbar actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectAction {
    Back,
    Change,
    Jnlp,
    Disable,
    Enable,
    Delete,
    Restore,
    Save,
    Cancel,
}

impl ProjectAction {
    pub const ALL: [ProjectAction; 9] = [
        ProjectAction::Back,
        ProjectAction::Change,
        ProjectAction::Jnlp,
        ProjectAction::Disable,
        ProjectAction::Enable,
        ProjectAction::Delete,
        ProjectAction::Restore,
        ProjectAction::Save,
        ProjectAction::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectAction::Back => "back",
            ProjectAction::Change => "change",
            ProjectAction::Jnlp => "jnlp",
            ProjectAction::Disable => "disable",
            ProjectAction::Enable => "enable",
            ProjectAction::Delete => "delete",
            ProjectAction::Restore => "restore",
            ProjectAction::Save => "save",
            ProjectAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status tag shown next to the project name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    WillBeDeleted,
    HasBeenDisabled,
    WillBeDisabled,
}

impl ProjectStatus {
    /// Phrase key of the tag.
    pub fn phrase(&self) -> &'static str {
        match self {
            ProjectStatus::WillBeDeleted => "Project will be deleted",
            ProjectStatus::HasBeenDisabled => "Project has been disabled",
            ProjectStatus::WillBeDisabled => "Project will be disabled",
        }
    }
}

/// Computed state of the project toolbar and form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectToolbar {
    pub back: ActionState,
    pub change: ActionState,
    pub jnlp: ActionState,
    pub disable: ActionState,
    pub enable: ActionState,
    pub delete: ActionState,
    pub restore: ActionState,
    pub save: ActionState,
    pub cancel: ActionState,
    /// Phrase key of the jnlp button.
    pub jnlp_label: &'static str,
    /// Phrase key of the hint pointing at the jnlp button.
    pub jnlp_hint: Option<&'static str>,
    /// Editable project fields are locked.
    pub fields_readonly: bool,
    pub icons_editable: bool,
    pub status: Option<ProjectStatus>,
}

impl ProjectToolbar {
    pub fn state(&self, action: ProjectAction) -> ActionState {
        match action {
            ProjectAction::Back => self.back,
            ProjectAction::Change => self.change,
            ProjectAction::Jnlp => self.jnlp,
            ProjectAction::Disable => self.disable,
            ProjectAction::Enable => self.enable,
            ProjectAction::Delete => self.delete,
            ProjectAction::Restore => self.restore,
            ProjectAction::Save => self.save,
            ProjectAction::Cancel => self.cancel,
        }
    }
}

/// Compute the project toolbar.
///
/// `origin` is the project as last loaded, used for the status tag.
pub fn project_toolbar(deploying: bool, project: &Project, origin: &Project) -> ProjectToolbar {
    let initial = project.initial;
    let disabled = project.disabled;
    let deleted = project.deleted;

    let status = if deleted {
        Some(ProjectStatus::WillBeDeleted)
    } else if disabled && origin.disabled {
        Some(ProjectStatus::HasBeenDisabled)
    } else if disabled {
        Some(ProjectStatus::WillBeDisabled)
    } else {
        None
    };

    ProjectToolbar {
        back: ActionState::new(deploying, false),
        change: ActionState::new(deploying, false),
        jnlp: ActionState::new(!deploying || disabled || deleted, false),
        disable: ActionState::new(!deploying || initial || disabled || deleted, disabled),
        enable: ActionState::new(!deploying || initial || !disabled || deleted, !disabled),
        delete: ActionState::new(!deploying || initial || deleted, deleted),
        restore: ActionState::new(!deploying || initial || !deleted, !deleted),
        save: ActionState::new(!deploying || initial, false),
        cancel: ActionState::new(!deploying, false),
        jnlp_label: if initial { "Upload JNLP" } else { "Update JNLP" },
        jnlp_hint: (deploying && initial).then_some("Click to upload JNLP file"),
        fields_readonly: !deploying || initial || disabled || deleted,
        icons_editable: deploying,
        status,
    }
}

/// Library toolbar actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryAction {
    Add,
    Disable,
    Enable,
    Delete,
    Restore,
    Up,
    Down,
}

impl LibraryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryAction::Add => "add",
            LibraryAction::Disable => "disable",
            LibraryAction::Enable => "enable",
            LibraryAction::Delete => "delete",
            LibraryAction::Restore => "restore",
            LibraryAction::Up => "up",
            LibraryAction::Down => "down",
        }
    }
}

impl fmt::Display for LibraryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed state of the library toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryToolbar {
    pub readonly: bool,
    pub add: ActionState,
    pub disable: ActionState,
    pub enable: ActionState,
    pub delete: ActionState,
    pub restore: ActionState,
    pub up: ActionState,
    pub down: ActionState,
}

impl LibraryToolbar {
    pub fn state(&self, action: LibraryAction) -> ActionState {
        match action {
            LibraryAction::Add => self.add,
            LibraryAction::Disable => self.disable,
            LibraryAction::Enable => self.enable,
            LibraryAction::Delete => self.delete,
            LibraryAction::Restore => self.restore,
            LibraryAction::Up => self.up,
            LibraryAction::Down => self.down,
        }
    }
}

/// Compute the library toolbar.
///
/// `selected` is the overlaid record of the selected row when that row is a
/// top-level library; `None` for no selection or a module row.
pub fn library_toolbar(
    project_bar: &ProjectToolbar,
    project: &Project,
    selected: Option<&Library>,
) -> LibraryToolbar {
    let readonly = !project_bar.save.enabled || project.disabled || project.deleted;
    let no_library = selected.is_none();
    let lib_disabled = selected.is_some_and(|l| l.disabled);
    let lib_deleted = selected.is_some_and(|l| l.deleted);

    LibraryToolbar {
        readonly,
        add: ActionState::new(readonly, false),
        disable: ActionState::new(readonly || no_library || lib_disabled, lib_disabled),
        enable: ActionState::new(readonly || no_library || !lib_disabled, !lib_disabled),
        delete: ActionState::new(readonly || no_library || lib_deleted, lib_deleted),
        restore: ActionState::new(readonly || no_library || !lib_deleted, !lib_deleted),
        up: ActionState::new(readonly || no_library, false),
        down: ActionState::new(readonly || no_library, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(initial: bool, disabled: bool, deleted: bool) -> Project {
        Project {
            initial,
            disabled,
            deleted,
            ..Project::new("crm")
        }
    }

    #[test]
    fn test_not_deploying_locks_lifecycle_actions() {
        let p = project(false, false, false);
        let bar = project_toolbar(false, &p, &p);
        assert!(bar.back.enabled);
        assert!(bar.change.enabled);
        for action in [
            ProjectAction::Jnlp,
            ProjectAction::Disable,
            ProjectAction::Delete,
            ProjectAction::Save,
            ProjectAction::Cancel,
        ] {
            assert!(!bar.state(action).enabled, "{action} should be disabled");
        }
        assert!(bar.fields_readonly);
        assert!(!bar.icons_editable);
    }

    #[test]
    fn test_initial_deploy() {
        let p = project(true, false, false);
        let bar = project_toolbar(true, &p, &p);
        assert!(!bar.save.enabled);
        assert!(bar.jnlp.enabled);
        assert!(!bar.disable.enabled);
        assert!(!bar.delete.enabled);
        assert!(bar.cancel.enabled);
        assert!(!bar.back.enabled);
        assert_eq!(bar.jnlp_label, "Upload JNLP");
        assert_eq!(bar.jnlp_hint, Some("Click to upload JNLP file"));
        assert!(bar.fields_readonly);
        assert!(bar.icons_editable);
    }

    #[test]
    fn test_regular_deploy() {
        let p = project(false, false, false);
        let bar = project_toolbar(true, &p, &p);
        assert!(bar.save.enabled);
        assert!(bar.disable.usable());
        assert!(bar.enable.hidden);
        assert!(bar.delete.usable());
        assert!(bar.restore.hidden);
        assert_eq!(bar.jnlp_label, "Update JNLP");
        assert_eq!(bar.jnlp_hint, None);
        assert!(!bar.fields_readonly);
        assert_eq!(bar.status, None);
    }

    #[test]
    fn test_disabled_project() {
        let origin = project(false, false, false);
        let p = project(false, true, false);
        let bar = project_toolbar(true, &p, &origin);
        assert!(bar.disable.hidden);
        assert!(bar.enable.usable());
        assert!(!bar.jnlp.enabled);
        assert!(bar.fields_readonly);
        assert_eq!(bar.status, Some(ProjectStatus::WillBeDisabled));

        let bar = project_toolbar(true, &p, &p);
        assert_eq!(bar.status, Some(ProjectStatus::HasBeenDisabled));
    }

    #[test]
    fn test_deleted_project() {
        let p = project(false, true, true);
        let bar = project_toolbar(true, &p, &p);
        assert!(bar.delete.hidden);
        assert!(bar.restore.usable());
        assert!(!bar.enable.enabled);
        assert_eq!(bar.status, Some(ProjectStatus::WillBeDeleted));
        assert_eq!(bar.status.map(|s| s.phrase()), Some("Project will be deleted"));
    }

    #[test]
    fn test_library_toolbar_readonly() {
        let p = project(false, false, false);
        let lib = Library::new("crm-core");
        let bar = library_toolbar(&project_toolbar(false, &p, &p), &p, Some(&lib));
        assert!(bar.readonly);
        assert!(!bar.add.enabled);
        assert!(!bar.up.enabled);

        let p = project(false, true, false);
        let bar = library_toolbar(&project_toolbar(true, &p, &p), &p, Some(&lib));
        assert!(bar.readonly);
    }

    #[test]
    fn test_library_toolbar_selection() {
        let p = project(false, false, false);
        let project_bar = project_toolbar(true, &p, &p);

        let bar = library_toolbar(&project_bar, &p, None);
        assert!(bar.add.enabled);
        assert!(!bar.up.enabled);
        assert!(!bar.down.enabled);
        assert!(!bar.disable.enabled);

        let mut lib = Library::new("crm-core");
        let bar = library_toolbar(&project_bar, &p, Some(&lib));
        assert!(bar.up.enabled && bar.down.enabled);
        assert!(bar.disable.usable());
        assert!(bar.enable.hidden);
        assert!(bar.delete.usable());

        lib.disabled = true;
        lib.deleted = true;
        let bar = library_toolbar(&project_bar, &p, Some(&lib));
        assert!(bar.disable.hidden);
        assert!(bar.enable.usable());
        assert!(bar.delete.hidden);
        assert!(bar.restore.usable());
    }

    #[test]
    fn test_initial_project_library_toolbar_readonly() {
        let p = project(true, false, false);
        let bar = library_toolbar(&project_toolbar(true, &p, &p), &p, None);
        assert!(bar.readonly);
        assert!(!bar.state(LibraryAction::Add).enabled);
    }
}

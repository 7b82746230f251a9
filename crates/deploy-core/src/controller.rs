//! Deploy controller: the console's handlers for one project.
//!
//! Each handler checks the lifecycle gate, locks the acting view, calls the
//! server and folds the response back into the session and library grid.
//! Errors are returned to the caller, which shows them; nothing is retried
//! except by explicit user choice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deploy_models::{parse_name_version, validate_project_name, IconKind, ProjectEntry};
use tracing::{debug, info, warn};

use crate::content;
use crate::error::{DeployError, Result};
use crate::gate::{
    library_toolbar, project_toolbar, LibraryAction, LibraryToolbar, ProjectAction, ProjectToolbar,
};
use crate::gateway::DeployApi;
use crate::libraries::LibraryGrid;
use crate::lock::BusyLock;
use crate::phrases::PhraseBook;
use crate::prompt::Prompter;
use crate::reorder::{execute_move, plan_move, Direction};
use crate::session::DeploySession;
use crate::upload::{UploadOutcome, UploadWorkflow};

/// Confirmation shown before finishing a deploy that deletes the project.
pub const FINISH_DELETE_PROJECT: &str = "The project will be removed permanently, continue?";
/// Confirmation shown before finishing a deploy that deletes libraries.
pub const FINISH_DELETE_LIBRARY: &str =
    "The library marked delete will be removed permanently, continue?";
/// Confirmation shown before finishing any other deploy.
pub const FINISH_SAVE: &str = "Save project changes now?";

/// Fetch the project list.
pub async fn list_projects(api: &dyn DeployApi) -> Result<Vec<ProjectEntry>> {
    let projects = api.list_projects().await?;
    debug!(count = projects.len(), "projects listed");
    Ok(projects)
}

/// Validate the name typed for a new project.
pub fn new_project_name(name: &str) -> Result<String> {
    let name = name.trim();
    validate_project_name(name)?;
    Ok(name.to_string())
}

/// Library flag changes offered by the library toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryChange {
    Disable,
    Enable,
    Delete,
    Restore,
}

impl LibraryChange {
    fn action(self) -> LibraryAction {
        match self {
            LibraryChange::Disable => LibraryAction::Disable,
            LibraryChange::Enable => LibraryAction::Enable,
            LibraryChange::Delete => LibraryAction::Delete,
            LibraryChange::Restore => LibraryAction::Restore,
        }
    }
}

/// Handlers for the project being deployed.
pub struct DeployController {
    api: Arc<dyn DeployApi>,
    phrases: PhraseBook,
    session: DeploySession,
    grid: LibraryGrid,
    project_lock: BusyLock,
    library_lock: BusyLock,
}

impl DeployController {
    pub fn new(api: Arc<dyn DeployApi>, project_name: impl Into<String>, phrases: PhraseBook) -> Self {
        Self {
            api,
            phrases,
            session: DeploySession::new(project_name),
            grid: LibraryGrid::new(),
            project_lock: BusyLock::new("project form"),
            library_lock: BusyLock::new("library grid"),
        }
    }

    pub fn session(&self) -> &DeploySession {
        &self.session
    }

    pub fn grid(&self) -> &LibraryGrid {
        &self.grid
    }

    /// Grid access for selection and expansion.
    pub fn grid_mut(&mut self) -> &mut LibraryGrid {
        &mut self.grid
    }

    pub fn phrases(&self) -> &PhraseBook {
        &self.phrases
    }

    pub fn project_lock(&self) -> BusyLock {
        self.project_lock.clone()
    }

    pub fn library_lock(&self) -> BusyLock {
        self.library_lock.clone()
    }

    pub fn project_toolbar(&self) -> ProjectToolbar {
        project_toolbar(
            self.session.is_deploying(),
            &self.session.project,
            &self.session.origin,
        )
    }

    pub fn library_toolbar(&self) -> LibraryToolbar {
        library_toolbar(
            &self.project_toolbar(),
            &self.session.project,
            self.grid.selected_library().as_ref(),
        )
    }

    fn ensure_project_action(&self, action: ProjectAction) -> Result<()> {
        if !self.session.is_loaded() {
            return Err(DeployError::NotLoaded);
        }
        if self.project_toolbar().state(action).usable() {
            Ok(())
        } else {
            Err(DeployError::Unavailable(action.to_string()))
        }
    }

    fn ensure_library_action(&self, action: LibraryAction) -> Result<()> {
        if !self.session.is_loaded() {
            return Err(DeployError::NotLoaded);
        }
        if self.library_toolbar().state(action).usable() {
            Ok(())
        } else {
            Err(DeployError::Unavailable(format!("library {action}")))
        }
    }

    fn lang<'a>(&'a self, key: &'a str) -> &'a str {
        self.phrases.lookup(key)
    }

    /// Load the project for the first time.
    ///
    /// A project that was never deployed starts a deploy right away.
    pub async fn open(&mut self, prompter: &dyn Prompter) -> Result<()> {
        self.reload(true, prompter).await
    }

    /// Load project, icons and libraries; the deploy gate closes.
    pub async fn reload(&mut self, first_load: bool, prompter: &dyn Prompter) -> Result<()> {
        {
            let _guard = self.project_lock.acquire(self.lang("Loading project..."))?;
            let project = self.api.load_project(self.session.scope()).await?;
            self.session.load(project);
        }
        {
            let _guard = self.project_lock.acquire(self.lang("Loading icons..."))?;
            self.session.icons = self.api.load_icons(self.session.scope()).await?;
        }
        {
            let _guard = self.library_lock.acquire(self.lang("Loading libraries..."))?;
            let libraries = self.api.load_libraries(self.session.scope()).await?;
            self.grid.load(libraries);
        }
        debug!(
            project = self.session.project_name(),
            libraries = self.grid.len(),
            "project loaded"
        );

        if first_load && self.session.project.initial {
            info!(project = self.session.project_name(), "new project, starting deploy");
            self.start(prompter).await?;
        }
        Ok(())
    }

    /// Open a deploy task ("change").
    ///
    /// When another deploy is active the user may force a new one. Returns
    /// whether a task was opened.
    pub async fn start(&mut self, prompter: &dyn Prompter) -> Result<bool> {
        self.ensure_project_action(ProjectAction::Change)?;
        let mut force = false;
        loop {
            let task = {
                let _guard = self.project_lock.acquire(self.lang("Request deploy..."))?;
                self.api.start_deploy(self.session.scope(), force).await?
            };
            match task {
                Some(task) => {
                    info!(project = self.session.project_name(), force, "deploy started");
                    self.session.begin(task);
                    return Ok(true);
                }
                None => {
                    let confirmed = prompter
                        .confirm(
                            self.lang("Force Deploy"),
                            self.lang("The project already in deploy, forced new deploy?"),
                        )
                        .await;
                    if !confirmed {
                        return Ok(false);
                    }
                    force = true;
                }
            }
        }
    }

    /// Confirmation text for finishing the current deploy.
    pub fn finish_message(&self) -> &'static str {
        if self.session.project.deleted {
            FINISH_DELETE_PROJECT
        } else if self.grid.has_deleted() {
            FINISH_DELETE_LIBRARY
        } else {
            FINISH_SAVE
        }
    }

    /// Commit the deploy ("save") and reload.
    pub async fn finish(&mut self, prompter: &dyn Prompter) -> Result<bool> {
        self.ensure_project_action(ProjectAction::Save)?;
        let message = self.finish_message();
        if !prompter
            .confirm(self.lang("Save Deploy"), self.lang(message))
            .await
        {
            return Ok(false);
        }
        {
            let _guard = self.project_lock.acquire(self.lang("Request save..."))?;
            self.api.finish_deploy(self.session.scope()).await?;
        }
        info!(project = self.session.project_name(), "deploy finished");
        self.session.end();
        self.reload(false, prompter).await?;
        Ok(true)
    }

    /// Abandon the deploy and reload.
    pub async fn cancel(&mut self, prompter: &dyn Prompter) -> Result<bool> {
        self.ensure_project_action(ProjectAction::Cancel)?;
        if !prompter
            .confirm(
                self.lang("Cancel Deploy"),
                self.lang("Are you sure to cancel deploy?"),
            )
            .await
        {
            return Ok(false);
        }
        {
            let _guard = self.project_lock.acquire(self.lang("Request cancel..."))?;
            self.api.cancel_deploy(self.session.scope()).await?;
        }
        info!(project = self.session.project_name(), "deploy cancelled");
        self.session.end();
        self.reload(false, prompter).await?;
        Ok(true)
    }

    /// Upload a JNLP descriptor; its file name supplies the project version.
    pub async fn upload_jnlp(&mut self, path: &Path, prompter: &dyn Prompter) -> Result<bool> {
        self.ensure_project_action(ProjectAction::Jnlp)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !file_name.starts_with(self.session.project.name.as_str())
            && !prompter
                .confirm(&file_name, self.lang("File name not match the project, continue?"))
                .await
        {
            return Ok(false);
        }
        let jnlp = content::read_text(path).await?;
        let mut project = self.session.project.clone();
        project.version = parse_name_version(&file_name).1;
        self.update_project(project, Some(&jnlp)).await?;
        Ok(true)
    }

    /// Disable or enable the project.
    pub async fn set_disabled(&mut self, disabled: bool) -> Result<()> {
        let action = if disabled {
            ProjectAction::Disable
        } else {
            ProjectAction::Enable
        };
        self.ensure_project_action(action)?;
        let mut project = self.session.project.clone();
        project.disabled = disabled;
        self.update_project(project, None).await
    }

    /// Mark the project for deletion, or restore it.
    pub async fn set_deleted(&mut self, deleted: bool) -> Result<()> {
        let action = if deleted {
            ProjectAction::Delete
        } else {
            ProjectAction::Restore
        };
        self.ensure_project_action(action)?;
        let mut project = self.session.project.clone();
        project.deleted = deleted;
        self.update_project(project, None).await
    }

    /// Change one editable project field by its wire name.
    pub async fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        if !self.session.is_loaded() {
            return Err(DeployError::NotLoaded);
        }
        if self.project_toolbar().fields_readonly {
            return Err(DeployError::Unavailable(format!("edit {field}")));
        }
        let mut project = self.session.project.clone();
        if !project.set_field(field, value) {
            return Err(DeployError::Unavailable(format!("unknown field: {field}")));
        }
        self.update_project(project, None).await
    }

    async fn update_project(
        &mut self,
        project: deploy_models::Project,
        jnlp: Option<&str>,
    ) -> Result<()> {
        let _guard = self.project_lock.acquire(self.lang("Updating project..."))?;
        let updated = self
            .api
            .update_project(self.session.scope(), &project, jnlp)
            .await?;
        self.session.update(updated);
        Ok(())
    }

    /// Replace one icon with an image file.
    pub async fn upload_icon(&mut self, kind: IconKind, path: &Path) -> Result<()> {
        if !self.session.is_loaded() {
            return Err(DeployError::NotLoaded);
        }
        if !self.project_toolbar().icons_editable {
            return Err(DeployError::Unavailable(format!("{kind} icon")));
        }
        let icon = content::read_data_url(path).await?;
        let _guard = self.project_lock.acquire(self.lang("Updating icon..."))?;
        self.api
            .update_icon(self.session.scope(), kind, &icon)
            .await?;
        self.session.icons.set(kind, Some(icon));
        Ok(())
    }

    /// Apply a flag change to the selected library.
    pub async fn update_library(&mut self, change: LibraryChange) -> Result<()> {
        self.ensure_library_action(change.action())?;
        let Some(mut library) = self.grid.selected_library() else {
            return Err(DeployError::Unavailable(format!("library {}", change.action())));
        };
        match change {
            LibraryChange::Disable => library.disabled = true,
            LibraryChange::Enable => library.disabled = false,
            LibraryChange::Delete => library.deleted = true,
            LibraryChange::Restore => library.deleted = false,
        }
        library.modules = None;

        let _guard = self.library_lock.acquire(self.lang("Updating library..."))?;
        let acknowledged = self
            .api
            .update_library(self.session.scope(), &library, None)
            .await?;
        self.grid.apply_update(&acknowledged, false);
        Ok(())
    }

    /// Move the selected library one place up or down.
    ///
    /// Returns false when there is nothing to move past.
    pub async fn move_library(&mut self, direction: Direction) -> Result<bool> {
        let action = match direction {
            Direction::Up => LibraryAction::Up,
            Direction::Down => LibraryAction::Down,
        };
        self.ensure_library_action(action)?;
        let Some(plan) = plan_move(&self.grid, direction) else {
            return Ok(false);
        };
        let _guard = self.library_lock.acquire(self.lang("Updating library..."))?;
        execute_move(
            self.api.as_ref(),
            self.session.scope(),
            &mut self.grid,
            plan,
        )
        .await?;
        Ok(true)
    }

    /// Queue jar files for upload; names and versions may be corrected
    /// before running the workflow.
    pub fn prepare_upload(&self, paths: &[PathBuf]) -> Result<UploadWorkflow> {
        self.ensure_library_action(LibraryAction::Add)?;
        UploadWorkflow::from_paths(paths)
    }

    /// Run (or re-run) a bulk upload.
    pub async fn run_upload(
        &mut self,
        workflow: &mut UploadWorkflow,
        prompter: &dyn Prompter,
    ) -> Result<UploadOutcome> {
        self.ensure_library_action(LibraryAction::Add)?;
        let _guard = self.library_lock.acquire(self.lang("Preparing upload..."))?;
        workflow
            .run(
                self.api.as_ref(),
                self.session.scope(),
                &mut self.grid,
                prompter,
                &self.phrases,
            )
            .await
    }

    /// Leave the project, cancelling an open deploy task best-effort.
    pub async fn close(&mut self) {
        if self.session.task().is_none() {
            return;
        }
        if let Err(e) = self.api.cancel_deploy(self.session.scope()).await {
            warn!(project = self.session.project_name(), error = %e, "cancel on exit failed");
        }
        self.session.end();
    }
}

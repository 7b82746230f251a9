//! State of the project being deployed.

use deploy_models::{DeployTask, Icons, Project};
use tracing::debug;

/// Project name and deploy token attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskScope<'a> {
    pub project: &'a str,
    pub task: Option<&'a DeployTask>,
}

impl<'a> TaskScope<'a> {
    /// Scope for a project with no open deploy task.
    pub fn new(project: &'a str) -> Self {
        Self {
            project,
            task: None,
        }
    }

    pub fn with_task(mut self, task: Option<&'a DeployTask>) -> Self {
        self.task = task;
        self
    }
}

/// Everything the console knows about the project it is editing.
///
/// `origin` is the record as loaded, kept to tell "has been disabled" from
/// "will be disabled".
#[derive(Debug, Clone, Default)]
pub struct DeploySession {
    project_name: String,
    pub project: Project,
    pub origin: Project,
    pub icons: Icons,
    task: Option<DeployTask>,
    deploying: bool,
    loaded: bool,
}

impl DeploySession {
    pub fn new(project_name: impl Into<String>) -> Self {
        let project_name = project_name.into();
        Self {
            project: Project::new(project_name.clone()),
            origin: Project::new(project_name.clone()),
            project_name,
            ..Self::default()
        }
    }

    /// Name the session was opened for; used in every request path.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn scope(&self) -> TaskScope<'_> {
        TaskScope::new(&self.project_name).with_task(self.task.as_ref())
    }

    pub fn task(&self) -> Option<&DeployTask> {
        self.task.as_ref()
    }

    pub fn is_deploying(&self) -> bool {
        self.deploying
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Install a freshly loaded project; the deploy gate starts closed.
    pub fn load(&mut self, project: Project) {
        self.origin = project.clone();
        self.project = project;
        self.deploying = false;
        self.loaded = true;
    }

    /// Record the token returned by `_start`.
    pub fn begin(&mut self, task: DeployTask) {
        debug!(project = %self.project_name, %task, "deploy task opened");
        self.task = Some(task);
        self.deploying = true;
    }

    /// Replace the project with a server-acknowledged update.
    pub fn update(&mut self, project: Project) {
        self.project = project;
        self.deploying = true;
    }

    /// Forget the deploy task after finish or cancel.
    pub fn end(&mut self) -> Option<DeployTask> {
        self.deploying = false;
        self.task.take()
    }
}

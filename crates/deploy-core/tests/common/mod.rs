//! Shared fakes for deploy-core integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use deploy_core::{DeployApi, DeployError, Prompter, Result, TaskScope, UploadDecision};
use deploy_models::{
    DeployTask, IconKind, Icons, Library, Module, Project, ProjectEntry, UploadItem,
};

/// One request seen by the mock server.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: String,
    pub task: Option<String>,
    pub library: Option<Library>,
    pub jar: bool,
}

/// In-memory deploy server.
pub struct MockDeployApi {
    pub project: Mutex<Project>,
    pub libraries: Mutex<Vec<Library>>,
    pub icons: Mutex<Icons>,
    pub start_tokens: Mutex<VecDeque<Option<String>>>,
    /// Library name -> number of `_lib` requests to reject.
    pub failures: Mutex<HashMap<String, usize>>,
    /// Reject every `_lib` request from this (1-based) call on.
    pub lib_failures_from: Mutex<Option<usize>>,
    pub fail_cancel: Mutex<bool>,
    pub last_jnlp: Mutex<Option<String>>,
    calls: Mutex<Vec<Call>>,
}

impl MockDeployApi {
    pub fn new(project: Project, libraries: Vec<Library>) -> Self {
        Self {
            project: Mutex::new(project),
            libraries: Mutex::new(libraries),
            icons: Mutex::new(Icons::default()),
            start_tokens: Mutex::new(VecDeque::new()),
            failures: Mutex::new(HashMap::new()),
            lib_failures_from: Mutex::new(None),
            fail_cancel: Mutex::new(false),
            last_jnlp: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_start_tokens(self, tokens: &[Option<&str>]) -> Self {
        *self.start_tokens.lock().unwrap() =
            tokens.iter().map(|t| t.map(str::to_string)).collect();
        self
    }

    pub fn fail_library(&self, name: &str, times: usize) {
        self.failures.lock().unwrap().insert(name.to_string(), times);
    }

    pub fn fail_lib_calls_from(&self, call: usize) {
        *self.lib_failures_from.lock().unwrap() = Some(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, endpoint: &str, scope: Option<TaskScope<'_>>) {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            task: scope.and_then(|s| s.task).map(|t| t.as_str().to_string()),
            library: None,
            jar: false,
        });
    }
}

fn server_error(body: &str) -> DeployError {
    DeployError::Server {
        status: 500,
        reason: "Internal Server Error".into(),
        body: body.into(),
    }
}

#[async_trait]
impl DeployApi for MockDeployApi {
    async fn list_projects(&self) -> Result<Vec<ProjectEntry>> {
        self.record("GET _list", None);
        let project = self.project.lock().unwrap().clone();
        Ok(vec![
            ProjectEntry {
                project,
                deploy_allowed: true,
            },
            ProjectEntry {
                project: Project::new("$add"),
                deploy_allowed: true,
            },
        ])
    }

    async fn phrases(&self, _locale: &str) -> Result<HashMap<String, String>> {
        self.record("GET locale", None);
        Err(server_error("no locale"))
    }

    async fn load_project(&self, scope: TaskScope<'_>) -> Result<Project> {
        self.record("GET _project", Some(scope));
        Ok(self.project.lock().unwrap().clone())
    }

    async fn update_project(
        &self,
        scope: TaskScope<'_>,
        project: &Project,
        jnlp_content: Option<&str>,
    ) -> Result<Project> {
        self.record("POST _project", Some(scope));
        let mut stored = project.clone();
        if jnlp_content.is_some() {
            stored.initial = false;
        }
        *self.last_jnlp.lock().unwrap() = jnlp_content.map(str::to_string);
        *self.project.lock().unwrap() = stored.clone();
        Ok(stored)
    }

    async fn load_icons(&self, scope: TaskScope<'_>) -> Result<Icons> {
        self.record("GET _icons", Some(scope));
        Ok(self.icons.lock().unwrap().clone())
    }

    async fn update_icon(&self, scope: TaskScope<'_>, kind: IconKind, content: &str) -> Result<()> {
        self.record("POST _icons", Some(scope));
        self.icons.lock().unwrap().set(kind, Some(content.to_string()));
        Ok(())
    }

    async fn load_libraries(&self, scope: TaskScope<'_>) -> Result<Vec<Library>> {
        self.record("GET _libs", Some(scope));
        Ok(self.libraries.lock().unwrap().clone())
    }

    async fn update_library(
        &self,
        scope: TaskScope<'_>,
        library: &Library,
        jar_content: Option<&str>,
    ) -> Result<Library> {
        self.calls.lock().unwrap().push(Call {
            endpoint: "POST _lib".into(),
            task: scope.task.map(|t| t.as_str().to_string()),
            library: Some(library.clone()),
            jar: jar_content.is_some(),
        });

        let lib_calls = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint == "POST _lib")
            .count();
        if self
            .lib_failures_from
            .lock()
            .unwrap()
            .is_some_and(|from| lib_calls >= from)
        {
            return Err(server_error("library update rejected"));
        }

        if let Some(remaining) = self.failures.lock().unwrap().get_mut(&library.name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(server_error("jar rejected"));
            }
        }

        let mut stored = library.clone();
        if let Some(jar) = jar_content {
            stored.file_size = jar.len() as u64;
            stored.modules = Some(vec![Module {
                class_name: format!("com.acme.{}.Main", library.name),
                ..Module::default()
            }]);
        }
        let mut libraries = self.libraries.lock().unwrap();
        match libraries.iter_mut().find(|l| l.name == stored.name) {
            Some(existing) => *existing = stored.clone(),
            None => libraries.push(stored.clone()),
        }
        Ok(stored)
    }

    async fn start_deploy(&self, scope: TaskScope<'_>, force: bool) -> Result<Option<DeployTask>> {
        let endpoint = if force { "POST _start force" } else { "POST _start" };
        self.record(endpoint, Some(scope));
        let token = self
            .start_tokens
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Some("task-1".to_string()));
        Ok(token.map(DeployTask::new))
    }

    async fn finish_deploy(&self, scope: TaskScope<'_>) -> Result<()> {
        self.record("POST _finish", Some(scope));
        let mut project = self.project.lock().unwrap();
        project.initial = false;
        self.libraries.lock().unwrap().retain(|l| !l.deleted);
        Ok(())
    }

    async fn cancel_deploy(&self, scope: TaskScope<'_>) -> Result<()> {
        self.record("POST _cancel", Some(scope));
        if *self.fail_cancel.lock().unwrap() {
            return Err(DeployError::Transport("connection refused".into()));
        }
        Ok(())
    }

    async fn runtime_jnlp(&self, project: &str) -> Result<String> {
        self.record("GET jnlp", None);
        Ok(format!("<jnlp href=\"{project}.jnlp\"/>"))
    }

    async fn runtime_modules(&self, _project: &str) -> Result<Vec<Module>> {
        self.record("GET _modules", None);
        Ok(Vec::new())
    }
}

/// Prompter answering from scripts and recording what it was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: Mutex<VecDeque<bool>>,
    pub decisions: Mutex<VecDeque<UploadDecision>>,
    pub asked: Mutex<Vec<String>>,
    pub failed_files: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Answers yes to everything not scripted.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[bool]) -> Self {
        let prompter = Self::default();
        *prompter.answers.lock().unwrap() = answers.iter().copied().collect();
        prompter
    }

    pub fn deciding(decisions: &[UploadDecision]) -> Self {
        let prompter = Self::default();
        *prompter.decisions.lock().unwrap() = decisions.iter().copied().collect();
        prompter
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, _title: &str, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(true)
    }

    async fn upload_failed(&self, item: &UploadItem, _error: &DeployError) -> UploadDecision {
        self.failed_files.lock().unwrap().push(item.file_name.clone());
        self.decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(UploadDecision::Abort)
    }

    fn show_error(&self, error: &DeployError) {
        self.notices.lock().unwrap().push(format!("error: {error}"));
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

/// Library record as the server lists it.
pub fn library(name: &str, sequence: u32) -> Library {
    Library {
        sequence,
        major: sequence == 1,
        version: Some("1.0".into()),
        file_size: 1024,
        ..Library::new(name)
    }
}

/// Write a fake jar into `dir`.
pub fn write_jar(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, b"PK\x03\x04fake-jar").unwrap();
    path
}

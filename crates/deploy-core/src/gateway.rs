//! Server gateway for the deploy REST endpoints.
//!
//! [`DeployApi`] is the seam between the console and the server;
//! [`HttpGateway`] implements it over HTTP with reqwest. Every deploy
//! request carries the `deployTask` header while a task is open, and a JSON
//! `null` body reads as "no data".

use std::collections::HashMap;

use async_trait::async_trait;
use deploy_models::{DeployTask, IconKind, Icons, Library, Module, Project, ProjectEntry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{DeployError, Result};
use crate::session::TaskScope;

/// Header carrying the deploy task token.
pub const DEPLOY_TASK_HEADER: &str = "deployTask";

/// Header asking `_start` to take over an active deploy.
pub const FORCE_DEPLOY_HEADER: &str = "forceDeploy";

/// Operations offered by the deploy server.
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// `GET B/_list`
    async fn list_projects(&self) -> Result<Vec<ProjectEntry>>;

    /// `GET B/locale_<tag>.json`
    async fn phrases(&self, locale: &str) -> Result<HashMap<String, String>>;

    /// `GET _project`
    async fn load_project(&self, scope: TaskScope<'_>) -> Result<Project>;

    /// `POST _project` with `{project, jnlpContent}`.
    async fn update_project(
        &self,
        scope: TaskScope<'_>,
        project: &Project,
        jnlp_content: Option<&str>,
    ) -> Result<Project>;

    /// `GET _icons`
    async fn load_icons(&self, scope: TaskScope<'_>) -> Result<Icons>;

    /// `POST _icons` with `{kind, iconContent}`.
    async fn update_icon(&self, scope: TaskScope<'_>, kind: IconKind, content: &str)
        -> Result<()>;

    /// `GET _libs`
    async fn load_libraries(&self, scope: TaskScope<'_>) -> Result<Vec<Library>>;

    /// `POST _lib` with `{library, jarContent?}`.
    async fn update_library(
        &self,
        scope: TaskScope<'_>,
        library: &Library,
        jar_content: Option<&str>,
    ) -> Result<Library>;

    /// `POST _start`; `None` when another deploy is active.
    async fn start_deploy(&self, scope: TaskScope<'_>, force: bool) -> Result<Option<DeployTask>>;

    /// `POST _finish`
    async fn finish_deploy(&self, scope: TaskScope<'_>) -> Result<()>;

    /// `POST _cancel`
    async fn cancel_deploy(&self, scope: TaskScope<'_>) -> Result<()>;

    /// `GET B/<project>/<project>.jnlp`
    async fn runtime_jnlp(&self, project: &str) -> Result<String>;

    /// `GET B/<project>/_modules`
    async fn runtime_modules(&self, project: &str) -> Result<Vec<Module>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectUpdate<'a> {
    project: &'a Project,
    jnlp_content: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LibraryUpdate<'a> {
    library: &'a Library,
    #[serde(skip_serializing_if = "Option::is_none")]
    jar_content: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IconUpdate<'a> {
    kind: IconKind,
    icon_content: &'a str,
}

/// HTTP implementation of [`DeployApi`].
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpGateway {
    /// Create a gateway for the configured server.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DeployError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get(&self, url: Url, scope: Option<TaskScope<'_>>) -> reqwest::RequestBuilder {
        with_task(self.client.get(url), scope)
    }

    fn post(&self, url: Url, scope: TaskScope<'_>) -> reqwest::RequestBuilder {
        with_task(self.client.post(url), Some(scope))
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| DeployError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let url = response.url().clone();
        let text = response
            .text()
            .await
            .map_err(|e| DeployError::Transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "server rejected request");
            return Err(DeployError::Server {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: text,
            });
        }

        trace!(%url, bytes = text.len(), "response received");
        Ok(text)
    }

    /// Send a request and decode its JSON body; `null` or empty gives `None`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let text = self.send(request).await?;
        decode_nullable(&text)
    }
}

fn with_task(
    request: reqwest::RequestBuilder,
    scope: Option<TaskScope<'_>>,
) -> reqwest::RequestBuilder {
    match scope.and_then(|s| s.task) {
        Some(task) => request.header(DEPLOY_TASK_HEADER, task.as_str()),
        None => request,
    }
}

/// Decode a JSON body where `null` (or nothing) means "no data".
pub fn decode_nullable<T: DeserializeOwned>(text: &str) -> Result<Option<T>> {
    let text = text.trim();
    if text.is_empty() || text == "null" {
        return Ok(None);
    }
    Ok(serde_json::from_str(text)?)
}

#[async_trait]
impl DeployApi for HttpGateway {
    async fn list_projects(&self) -> Result<Vec<ProjectEntry>> {
        let request = self.get(self.config.list_url(), None);
        Ok(self.send_json(request).await?.unwrap_or_default())
    }

    async fn phrases(&self, locale: &str) -> Result<HashMap<String, String>> {
        let request = self.get(self.config.locale_url(locale), None);
        Ok(self.send_json(request).await?.unwrap_or_default())
    }

    async fn load_project(&self, scope: TaskScope<'_>) -> Result<Project> {
        let url = self.config.deploy_url(scope.project, "_project");
        let project = self.send_json(self.get(url, Some(scope))).await?;
        Ok(project.unwrap_or_else(|| Project::new(scope.project)))
    }

    async fn update_project(
        &self,
        scope: TaskScope<'_>,
        project: &Project,
        jnlp_content: Option<&str>,
    ) -> Result<Project> {
        let url = self.config.deploy_url(scope.project, "_project");
        let body = ProjectUpdate {
            project,
            jnlp_content,
        };
        debug!(
            project = scope.project,
            with_jnlp = jnlp_content.is_some(),
            "updating project"
        );
        let project = self.send_json(self.post(url, scope).json(&body)).await?;
        Ok(project.unwrap_or_else(|| Project::new(scope.project)))
    }

    async fn load_icons(&self, scope: TaskScope<'_>) -> Result<Icons> {
        let url = self.config.deploy_url(scope.project, "_icons");
        Ok(self
            .send_json(self.get(url, Some(scope)))
            .await?
            .unwrap_or_default())
    }

    async fn update_icon(
        &self,
        scope: TaskScope<'_>,
        kind: IconKind,
        content: &str,
    ) -> Result<()> {
        let url = self.config.deploy_url(scope.project, "_icons");
        let body = IconUpdate {
            kind,
            icon_content: content,
        };
        debug!(project = scope.project, %kind, "updating icon");
        self.send(self.post(url, scope).json(&body)).await?;
        Ok(())
    }

    async fn load_libraries(&self, scope: TaskScope<'_>) -> Result<Vec<Library>> {
        let url = self.config.deploy_url(scope.project, "_libs");
        Ok(self
            .send_json(self.get(url, Some(scope)))
            .await?
            .unwrap_or_default())
    }

    async fn update_library(
        &self,
        scope: TaskScope<'_>,
        library: &Library,
        jar_content: Option<&str>,
    ) -> Result<Library> {
        let url = self.config.deploy_url(scope.project, "_lib");
        let body = LibraryUpdate {
            library,
            jar_content,
        };
        debug!(
            project = scope.project,
            library = %library.name,
            sequence = library.sequence,
            with_jar = jar_content.is_some(),
            "updating library"
        );
        Ok(self
            .send_json(self.post(url, scope).json(&body))
            .await?
            .unwrap_or_default())
    }

    async fn start_deploy(&self, scope: TaskScope<'_>, force: bool) -> Result<Option<DeployTask>> {
        let url = self.config.deploy_url(scope.project, "_start");
        let request = self
            .post(url, scope)
            .header(FORCE_DEPLOY_HEADER, force.to_string());
        let token: Option<String> = self.send_json(request).await?;
        Ok(token.filter(|t| !t.is_empty()).map(DeployTask::new))
    }

    async fn finish_deploy(&self, scope: TaskScope<'_>) -> Result<()> {
        let url = self.config.deploy_url(scope.project, "_finish");
        self.send(self.post(url, scope)).await?;
        Ok(())
    }

    async fn cancel_deploy(&self, scope: TaskScope<'_>) -> Result<()> {
        let url = self.config.deploy_url(scope.project, "_cancel");
        self.send(self.post(url, scope)).await?;
        Ok(())
    }

    async fn runtime_jnlp(&self, project: &str) -> Result<String> {
        let url = self.config.runtime_url(project, &format!("{project}.jnlp"));
        self.send(self.get(url, None)).await
    }

    async fn runtime_modules(&self, project: &str) -> Result<Vec<Module>> {
        let url = self.config.runtime_url(project, "_modules");
        Ok(self.send_json(self.get(url, None)).await?.unwrap_or_default())
    }
}

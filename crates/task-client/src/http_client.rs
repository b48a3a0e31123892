//! REST implementation of `TaskClient`
//!
//! Direct implementation of the `TaskClient` trait on top of the
//! [`ApiGateway`]. Authentication and token refresh are handled by the
//! gateway; this client only shapes requests and decodes responses.

use crate::client::TaskClient;
use crate::gateway::{ApiGateway, ApiRequest};
use crate::types::{
    Credentials, RegisteredUser, Registration, Task, TaskDraft, TaskFilter, TaskPatch,
    TaskStatistics, TokenPair,
};
use anyhow::Context;
use async_trait::async_trait;
use log::debug;

pub const LOGIN_PATH: &str = "/auth/login/";
pub const REGISTER_PATH: &str = "/auth/register/";
pub const TASKS_PATH: &str = "/tasks/";
pub const STATISTICS_PATH: &str = "/tasks/statistics/";

fn task_path(id: u64) -> String {
    format!("/tasks/{}/", id)
}

/// Task API client over HTTP
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    gateway: ApiGateway,
}

impl HttpTaskClient {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// The gateway carrying this client's session
    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }
}

#[async_trait]
impl TaskClient for HttpTaskClient {
    async fn login(&self, credentials: &Credentials) -> anyhow::Result<TokenPair> {
        debug!("Logging in as {}", credentials.email);
        let request = ApiRequest::post(LOGIN_PATH, credentials)?;
        let tokens: TokenPair = self.gateway.json(&request).await?;
        self.gateway.start_session(&tokens);
        Ok(tokens)
    }

    async fn register(&self, registration: &Registration) -> anyhow::Result<RegisteredUser> {
        registration.validate()?;
        debug!("Registering {}", registration.username);
        let request = ApiRequest::post(REGISTER_PATH, registration)?;
        let response = self.gateway.execute(&request).await?;
        let body = response
            .bytes()
            .await
            .context("Failed to read registration response")?;

        // The account payload is informational; an empty body still means success
        if body.is_empty() {
            return Ok(RegisteredUser::default());
        }
        Ok(serde_json::from_slice(&body).unwrap_or_else(|e| {
            debug!("Ignoring unexpected registration response: {}", e);
            RegisteredUser::default()
        }))
    }

    async fn fetch_tasks(&self, filter: &TaskFilter) -> anyhow::Result<Vec<Task>> {
        let request = ApiRequest::get(TASKS_PATH).with_query(filter.query_pairs());
        let tasks: Vec<Task> = self
            .gateway
            .json(&request)
            .await
            .context("Failed to fetch tasks")?;
        debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn create_task(&self, draft: &TaskDraft) -> anyhow::Result<Task> {
        draft.validate()?;
        let request = ApiRequest::post(TASKS_PATH, draft)?;
        let task: Task = self
            .gateway
            .json(&request)
            .await
            .context("Failed to create task")?;
        debug!("Created task #{}", task.id);
        Ok(task)
    }

    async fn update_task(&self, id: u64, patch: &TaskPatch) -> anyhow::Result<Task> {
        let request = ApiRequest::patch(task_path(id), patch)?;
        let task = self
            .gateway
            .json(&request)
            .await
            .with_context(|| format!("Failed to update task #{}", id))?;
        debug!("Updated task #{}", id);
        Ok(task)
    }

    async fn delete_task(&self, id: u64) -> anyhow::Result<()> {
        self.gateway
            .send(&ApiRequest::delete(task_path(id)))
            .await
            .with_context(|| format!("Failed to delete task #{}", id))?;
        debug!("Deleted task #{}", id);
        Ok(())
    }

    async fn fetch_statistics(&self) -> anyhow::Result<TaskStatistics> {
        Ok(self
            .gateway
            .json(&ApiRequest::get(STATISTICS_PATH))
            .await
            .context("Failed to fetch task statistics")?)
    }
}

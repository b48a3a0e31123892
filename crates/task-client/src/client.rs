//! Task client trait
//!
//! Defines the `TaskClient` trait that all client implementations satisfy.
//! The HTTP implementation talks to the REST API through the gateway;
//! decorators (such as usage tracking) wrap any implementation.

use crate::types::{
    Credentials, RegisteredUser, Registration, Task, TaskDraft, TaskFilter, TaskPatch,
    TaskStatistics, TokenPair,
};
use async_trait::async_trait;

/// Task API client
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use task_client::{TaskClient, TaskFilter};
///
/// async fn open_tasks(client: &dyn TaskClient) -> anyhow::Result<usize> {
///     let tasks = client.fetch_tasks(&TaskFilter::default()).await?;
///     Ok(tasks.iter().filter(|t| !t.completed).count())
/// }
/// ```
#[async_trait]
pub trait TaskClient: Send + Sync {
    // === Authentication ===

    /// Log in and keep the issued credential pair for subsequent calls
    async fn login(&self, credentials: &Credentials) -> anyhow::Result<TokenPair>;

    /// Create an account. Does not log in.
    async fn register(&self, registration: &Registration) -> anyhow::Result<RegisteredUser>;

    // === Tasks ===

    /// Fetch the current user's tasks matching `filter`
    async fn fetch_tasks(&self, filter: &TaskFilter) -> anyhow::Result<Vec<Task>>;

    /// Create a task from the form payload
    async fn create_task(&self, draft: &TaskDraft) -> anyhow::Result<Task>;

    /// Apply a partial update and return the updated task
    async fn update_task(&self, id: u64, patch: &TaskPatch) -> anyhow::Result<Task>;

    async fn delete_task(&self, id: u64) -> anyhow::Result<()>;

    /// Aggregate counts computed by the server
    async fn fetch_statistics(&self) -> anyhow::Result<TaskStatistics>;
}

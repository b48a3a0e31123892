//! Usage-tracking task client (decorator pattern)
//!
//! Wraps any `TaskClient` and records a usage event after each successful
//! task mutation or filtered list fetch. Failed calls record nothing.

use crate::recorder::EventRecorder;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use task_client::{
    Credentials, RegisteredUser, Registration, Task, TaskClient, TaskDraft, TaskFilter, TaskPatch,
    TaskStatistics, TokenPair,
};

/// Task client that feeds the usage recorder
///
/// # Example
///
/// ```rust,ignore
/// use task_analytics::{EventRecorder, TrackedTaskClient};
/// use std::sync::{Arc, Mutex};
///
/// let recorder = Arc::new(Mutex::new(EventRecorder::load(store, theme)));
/// let client = TrackedTaskClient::new(HttpTaskClient::new(gateway), recorder);
/// ```
#[derive(Debug, Clone)]
pub struct TrackedTaskClient<C: TaskClient + Clone> {
    inner: C,
    recorder: Arc<Mutex<EventRecorder>>,
}

impl<C: TaskClient + Clone> TrackedTaskClient<C> {
    pub fn new(inner: C, recorder: Arc<Mutex<EventRecorder>>) -> Self {
        Self { inner, recorder }
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The shared recorder events are written to
    pub fn recorder(&self) -> Arc<Mutex<EventRecorder>> {
        Arc::clone(&self.recorder)
    }

    fn lock(&self) -> MutexGuard<'_, EventRecorder> {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<C: TaskClient + Clone> TaskClient for TrackedTaskClient<C> {
    async fn login(&self, credentials: &Credentials) -> anyhow::Result<TokenPair> {
        self.inner.login(credentials).await
    }

    async fn register(&self, registration: &Registration) -> anyhow::Result<RegisteredUser> {
        self.inner.register(registration).await
    }

    async fn fetch_tasks(&self, filter: &TaskFilter) -> anyhow::Result<Vec<Task>> {
        let tasks = self.inner.fetch_tasks(filter).await?;

        let applied = filter.applied();
        if !applied.is_empty() {
            let mut recorder = self.lock();
            for kind in applied {
                recorder.record_filter_applied(kind.as_str());
            }
        }
        Ok(tasks)
    }

    async fn create_task(&self, draft: &TaskDraft) -> anyhow::Result<Task> {
        let task = self.inner.create_task(draft).await?;
        self.lock().record_task_created();
        Ok(task)
    }

    async fn update_task(&self, id: u64, patch: &TaskPatch) -> anyhow::Result<Task> {
        let task = self.inner.update_task(id, patch).await?;
        // Only an explicit completion counts; edits of finished tasks do not
        if patch.completed == Some(true) && task.completed {
            self.lock().record_task_completed();
        }
        Ok(task)
    }

    async fn delete_task(&self, id: u64) -> anyhow::Result<()> {
        self.inner.delete_task(id).await?;
        self.lock().record_task_deleted();
        Ok(())
    }

    async fn fetch_statistics(&self) -> anyhow::Result<TaskStatistics> {
        self.inner.fetch_statistics().await
    }
}

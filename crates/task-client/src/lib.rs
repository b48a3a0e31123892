//! Task REST API client with transparent token refresh
//!
//! This crate provides a trait-based client for the task API. The HTTP
//! implementation sends every call through an [`ApiGateway`], which attaches
//! the stored bearer token and silently refreshes it once when the server
//! answers `401 Unauthorized`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              TaskClient trait             │
//! │  - login() / register()                   │
//! │  - fetch_tasks() / create_task() / ...    │
//! └──────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │ HttpTaskClient                            │
//! └──────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │ ApiGateway                                │
//! │  bearer header, 401 → refresh → retry     │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use task_client::{ApiGateway, HttpTaskClient, TaskClient, TaskFilter};
//! use task_config::{CredentialStore, MemoryStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = CredentialStore::new(MemoryStore::shared());
//! let gateway = ApiGateway::new("http://localhost:8000/api", credentials);
//! let client = HttpTaskClient::new(gateway);
//!
//! let tasks = client.fetch_tasks(&TaskFilter::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod types;

pub use client::TaskClient;
pub use error::ApiError;
pub use gateway::{ApiGateway, ApiRequest, SessionEvent, REFRESH_PATH};
pub use http_client::HttpTaskClient;
pub use reqwest::{Method, StatusCode};
pub use types::{
    Credentials, FilterKind, Priority, PriorityCounts, RegisteredUser, Registration,
    StatusFilter, Task, TaskDraft, TaskFilter, TaskPatch, TaskStatistics, TaskSummary, TokenPair,
};

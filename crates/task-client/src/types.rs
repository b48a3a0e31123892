//! Task API data transfer objects
//!
//! These types mirror the JSON exchanged with the task REST API. Request
//! payloads (drafts, patches, filters, credentials) live here too, together
//! with the small amount of client-side validation the forms perform.

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ApiError::Validation(format!(
                "unknown priority '{}', expected low, medium or high",
                other
            ))),
        }
    }
}

/// A task from the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,

    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    /// Due date as sent by the server: a plain date or a full timestamp
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub completed: bool,

    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    /// Computed by the server; absent on older API versions
    #[serde(default)]
    pub is_overdue: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Calendar day the task is due, ignoring any time part
    pub fn due_day(&self) -> Option<NaiveDate> {
        let raw = self.due_date.as_deref()?;
        parse_day(date_part(raw))
    }
}

fn date_part(raw: &str) -> &str {
    raw.split('T').next().unwrap_or(raw)
}

fn parse_day(day: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").ok()
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tags arrive either as a JSON list or as the backend's comma-separated column
fn deserialize_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<String>),
        Joined(String),
    }

    let tags = match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::List(tags)) => tags,
        Some(Tags::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };

    Ok(tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

/// Payload of the create/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub priority: Priority,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    /// Pre-fill the form from an existing task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task
                .due_date
                .as_deref()
                .map(date_part)
                .unwrap_or_default()
                .to_string(),
            priority: task.priority,
            tags: task.tags.clone(),
        }
    }

    /// Add a tag; blank and duplicate tags are ignored
    ///
    /// Returns true if the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove a tag, returning true if it was present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Title and a valid due date are required
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".to_string()));
        }
        if parse_day(&self.due_date).is_none() {
            return Err(ApiError::Validation(format!(
                "due date '{}' is not a YYYY-MM-DD date",
                self.due_date
            )));
        }
        Ok(())
    }
}

/// Partial task update; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    /// Patch that only changes the completion flag
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Patch flipping the completion state of `task`
    pub fn toggle(task: &Task) -> Self {
        Self::completion(!task.completed)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<TaskDraft> for TaskPatch {
    fn from(draft: TaskDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            due_date: Some(draft.due_date),
            priority: Some(draft.priority),
            completed: None,
            tags: Some(draft.tags),
        }
    }
}

/// Completion state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl FromStr for StatusFilter {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(ApiError::Validation(format!(
                "unknown status '{}', expected all, pending or completed",
                other
            ))),
        }
    }
}

/// Which filter field a user set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Status,
    Priority,
    Tag,
    Search,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Status => "status",
            FilterKind::Priority => "priority",
            FilterKind::Tag => "tag",
            FilterKind::Search => "search",
        }
    }
}

/// Task list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    /// `None` means all priorities
    pub priority: Option<Priority>,
    pub tag: String,
    pub search: String,
}

impl TaskFilter {
    /// Query parameters for `GET /tasks/`; default fields add nothing
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Pending => pairs.push(("completed", "false".to_string())),
            StatusFilter::Completed => pairs.push(("completed", "true".to_string())),
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if !self.tag.is_empty() {
            pairs.push(("tags", self.tag.clone()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs
    }

    /// Fields set to a non-default value
    pub fn applied(&self) -> Vec<FilterKind> {
        let mut kinds = Vec::new();
        if self.status != StatusFilter::All {
            kinds.push(FilterKind::Status);
        }
        if self.priority.is_some() {
            kinds.push(FilterKind::Priority);
        }
        if !self.tag.is_empty() {
            kinds.push(FilterKind::Tag);
        }
        if !self.search.is_empty() {
            kinds.push(FilterKind::Search);
        }
        kinds
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Login form payload
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up form payload
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
}

impl Registration {
    /// The form refuses to submit when the two passwords differ
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.password != self.password2 {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Account returned by a successful registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Access/refresh pair issued at login
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Body of the token refresh call
#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response of the token refresh call
#[derive(Deserialize)]
pub(crate) struct RefreshedAccess {
    pub access: String,
}

/// Per-priority task counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub high: u64,
}

/// Server-side task statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    #[serde(default)]
    pub overdue: u64,
    #[serde(default)]
    pub by_priority: PriorityCounts,
}

/// Dashboard numbers derived from a fetched task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage, 0 for an empty list
    pub completion_rate: u8,
    /// High-priority tasks not yet completed
    pub high_priority_pending: usize,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u8
        } else {
            0
        };
        let high_priority_pending = tasks
            .iter()
            .filter(|t| t.priority == Priority::High && !t.completed)
            .count();

        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
            high_priority_pending,
        }
    }
}

//! Client-side usage analytics for task-manager
//!
//! This crate provides:
//! - The `Event` record and its well-known names
//! - `EventRecorder`: a bounded log of user actions mirrored to the store
//! - Aggregate statistics (theme preference, per-name counts)
//! - `TrackedTaskClient`: a `TaskClient` decorator that records task activity

pub mod event;
pub mod recorder;
pub mod stats;
pub mod tracked_client;

pub use event::{
    Event, Metadata, FILTER_APPLIED, TASK_COMPLETED, TASK_CREATED, TASK_DELETED, THEME_CHANGED,
};
pub use recorder::{EventRecorder, MAX_EVENTS, STORAGE_KEY};
pub use stats::{event_stats, theme_preference, ThemePreference};
pub use tracked_client::TrackedTaskClient;

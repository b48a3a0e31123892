//! Configuration and local state for task-manager
//!
//! This crate provides:
//! - File path utilities for config, cache and storage files
//! - Configuration file loading (TOML) and the `AppConfig`
//! - A persistent string key/value store standing in for browser local storage
//! - The credential store (access/refresh token pair)
//! - The shared theme flag

pub mod app_config;
pub mod config_file;
pub mod credentials;
pub mod paths;
pub mod storage;
pub mod theme;

pub use app_config::{AppConfig, API_URL_ENV, DEFAULT_API_BASE_URL};
pub use config_file::load_config_file;
pub use credentials::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use paths::{cache_dir, config_dir};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};
pub use theme::{Theme, ThemeState, THEME_KEY};

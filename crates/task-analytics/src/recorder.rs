//! Usage event recorder
//!
//! Keeps the most recent [`MAX_EVENTS`] user actions in memory and mirrors
//! the whole log to the store after every change. The log is read from the
//! store once, when the recorder is constructed.
//!
//! Storage problems never reach the caller: a missing or unreadable log
//! starts empty, and failed writes are logged and otherwise ignored.

use crate::event::{self, Event, Metadata};
use crate::stats::{self, ThemePreference};
use log::{debug, warn};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use task_config::{SharedStore, Theme, ThemeState};

/// Store key of the persisted event log
pub const STORAGE_KEY: &str = "task_manager_analytics";

/// Maximum number of events kept; older ones are evicted first
pub const MAX_EVENTS: usize = 100;

pub struct EventRecorder {
    /// Event log (oldest at front)
    events: VecDeque<Event>,
    store: SharedStore,
    theme: ThemeState,
}

impl fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecorder")
            .field("events", &self.events.len())
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl EventRecorder {
    /// Hydrate the recorder from the persisted log
    pub fn load(store: SharedStore, theme: ThemeState) -> Self {
        let mut events = match store.get_item(STORAGE_KEY) {
            Some(raw) => match serde_json::from_str::<VecDeque<Event>>(&raw) {
                Ok(events) => events,
                Err(e) => {
                    warn!("Discarding unreadable analytics log: {}", e);
                    VecDeque::new()
                }
            },
            None => VecDeque::new(),
        };

        if events.len() > MAX_EVENTS {
            let excess = events.len() - MAX_EVENTS;
            events.drain(..excess);
        }
        debug!("Loaded {} analytics events", events.len());

        Self {
            events,
            store,
            theme,
        }
    }

    /// Append an event stamped with the current time and theme
    pub fn record_event(&mut self, name: impl Into<String>, metadata: Option<Metadata>) {
        let event = Event::new(name, self.theme.current(), metadata);
        debug!("Recording event {}", event.event_name);

        self.events.push_back(event);
        while self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
        self.persist();
    }

    pub fn record_theme_changed(&mut self, theme: Theme) {
        self.record_event(
            event::THEME_CHANGED,
            Some(event::single("newTheme", theme.as_str())),
        );
    }

    pub fn record_task_created(&mut self) {
        self.record_event(event::TASK_CREATED, None);
    }

    pub fn record_task_completed(&mut self) {
        self.record_event(event::TASK_COMPLETED, None);
    }

    pub fn record_task_deleted(&mut self) {
        self.record_event(event::TASK_DELETED, None);
    }

    pub fn record_filter_applied(&mut self, filter_type: &str) {
        self.record_event(
            event::FILTER_APPLIED,
            Some(event::single("filterType", filter_type)),
        );
    }

    /// Snapshot of the log, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn theme_preference(&self) -> ThemePreference {
        stats::theme_preference(&self.events)
    }

    pub fn event_stats(&self) -> BTreeMap<String, usize> {
        stats::event_stats(&self.events)
    }

    /// Drop every event and the persisted copy
    pub fn clear_events(&mut self) {
        self.events.clear();
        if let Err(e) = self.store.remove_item(STORAGE_KEY) {
            warn!("Failed to remove analytics log: {:#}", e);
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.events) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize analytics log: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set_item(STORAGE_KEY, &json) {
            warn!("Failed to persist analytics log: {:#}", e);
        }
    }
}

//! Aggregate statistics over the event log

use crate::event::{Event, THEME_CHANGED};
use std::collections::BTreeMap;

/// How often each theme was switched to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemePreference {
    pub dark: usize,
    pub light: usize,
}

impl ThemePreference {
    pub fn total(&self) -> usize {
        self.dark + self.light
    }

    /// Share of switches to dark, rounded percent (0 when nothing was switched)
    pub fn dark_percentage(&self) -> u8 {
        if self.total() == 0 {
            return 0;
        }
        ((self.dark as f64 / self.total() as f64) * 100.0).round() as u8
    }
}

/// Tally `theme_changed` events by their `newTheme` attribute
///
/// Events whose `newTheme` is missing or anything but `dark`/`light` are not
/// counted.
pub fn theme_preference<'a>(events: impl IntoIterator<Item = &'a Event>) -> ThemePreference {
    events
        .into_iter()
        .filter(|event| event.event_name == THEME_CHANGED)
        .fold(ThemePreference::default(), |mut pref, event| {
            match event.metadata_str("newTheme") {
                Some("dark") => pref.dark += 1,
                Some("light") => pref.light += 1,
                _ => {}
            }
            pref
        })
}

/// Count events per name
pub fn event_stats<'a>(events: impl IntoIterator<Item = &'a Event>) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for event in events {
        *stats.entry(event.event_name.clone()).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{single, Metadata, TASK_CREATED};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use task_config::Theme;

    fn theme_event(new_theme: serde_json::Value) -> Event {
        let mut metadata = Metadata::new();
        metadata.insert("newTheme".to_string(), new_theme);
        Event::new(THEME_CHANGED, Theme::Light, Some(metadata))
    }

    #[test]
    fn test_theme_preference_ignores_other_values() {
        let events = vec![
            theme_event(json!("dark")),
            theme_event(json!("dark")),
            theme_event(json!("light")),
            theme_event(json!("sepia")),
            theme_event(json!(true)),
            Event::new(THEME_CHANGED, Theme::Dark, None),
            // Right value, wrong event
            Event::new(TASK_CREATED, Theme::Dark, Some(single("newTheme", "dark"))),
        ];

        let pref = theme_preference(&events);
        assert_eq!(pref, ThemePreference { dark: 2, light: 1 });
        assert_eq!(pref.total(), 3);
        assert_eq!(pref.dark_percentage(), 67);
    }

    #[test]
    fn test_dark_percentage_empty() {
        assert_eq!(ThemePreference::default().dark_percentage(), 0);
    }

    #[test]
    fn test_event_stats_counts_every_name() {
        let events = vec![
            Event::new(TASK_CREATED, Theme::Light, None),
            Event::new("custom", Theme::Light, None),
            Event::new(TASK_CREATED, Theme::Dark, None),
        ];

        let stats = event_stats(&events);
        assert_eq!(stats.get(TASK_CREATED), Some(&2));
        assert_eq!(stats.get("custom"), Some(&1));
        assert_eq!(stats.values().sum::<usize>(), events.len());
    }
}

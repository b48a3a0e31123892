//! Theme switching

use crate::cli::ThemeCommand;
use crate::context::AppContext;
use task_config::Theme;

pub fn run(ctx: &AppContext, command: ThemeCommand) -> String {
    match command {
        ThemeCommand::Show => format!("Theme: {}", ctx.theme.current()),
        ThemeCommand::Toggle => set(ctx, ctx.theme.current().toggled()),
        ThemeCommand::Set { theme } => set(ctx, theme),
    }
}

fn set(ctx: &AppContext, theme: Theme) -> String {
    if ctx.theme.is_attached() && ctx.theme.current() == theme {
        return format!("Theme is already {}.", theme);
    }
    ctx.theme.set_and_persist(theme, ctx.store.as_ref());
    ctx.recorder().record_theme_changed(theme);
    log::info!("Theme changed to {}", theme);
    format!("Theme set to {}.", theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use task_config::{AppConfig, KeyValueStore, MemoryStore};

    #[test]
    fn test_toggle_persists_and_records() {
        let store = MemoryStore::shared();
        let ctx = AppContext::with_store(AppConfig::default(), store.clone());

        assert_eq!(run(&ctx, ThemeCommand::Toggle), "Theme set to dark.");
        assert_eq!(store.get_item("theme").as_deref(), Some("dark"));

        let events = ctx.recorder().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata_str("newTheme"), Some("dark"));
        // Sampled after the switch
        assert_eq!(events[0].theme, Theme::Dark);
    }

    #[test]
    fn test_setting_current_theme_records_nothing() {
        let ctx = AppContext::with_store(AppConfig::default(), MemoryStore::shared());

        assert_eq!(
            run(&ctx, ThemeCommand::Set { theme: Theme::Light }),
            "Theme is already light."
        );
        assert!(ctx.recorder().is_empty());
        assert_eq!(run(&ctx, ThemeCommand::Show), "Theme: light");
    }
}

//! Application context
//!
//! Everything a command needs, built once at startup and passed down
//! explicitly: the store, the theme flag, the API gateway, the usage
//! recorder and the tracked task client.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use task_analytics::{EventRecorder, TrackedTaskClient};
use task_client::{ApiGateway, HttpTaskClient};
use task_config::{AppConfig, CredentialStore, FileStore, SharedStore, ThemeState};

pub struct AppContext {
    pub config: AppConfig,
    pub store: SharedStore,
    pub theme: ThemeState,
    pub gateway: ApiGateway,
    pub client: TrackedTaskClient<HttpTaskClient>,
    recorder: Arc<Mutex<EventRecorder>>,
}

impl AppContext {
    /// Open the configured store and wire up all services
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let path = config.resolve_storage_path()?;
        log::debug!("Using store at {:?}", path);
        let store: SharedStore = Arc::new(FileStore::open(path));
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: AppConfig, store: SharedStore) -> Self {
        let theme = ThemeState::restore(store.as_ref());
        let gateway = ApiGateway::new(
            config.api_base_url.clone(),
            CredentialStore::new(store.clone()),
        );
        let recorder = Arc::new(Mutex::new(EventRecorder::load(
            store.clone(),
            theme.clone(),
        )));
        let client =
            TrackedTaskClient::new(HttpTaskClient::new(gateway.clone()), recorder.clone());

        Self {
            config,
            store,
            theme,
            gateway,
            client,
            recorder,
        }
    }

    pub fn recorder(&self) -> MutexGuard<'_, EventRecorder> {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_config::{KeyValueStore, MemoryStore, Theme};

    #[test]
    fn test_restores_theme_and_events_from_store() {
        let store = MemoryStore::shared();
        store.set_item("theme", "dark").unwrap();
        {
            let ctx = AppContext::with_store(AppConfig::default(), store.clone());
            ctx.recorder().record_task_created();
        }

        let ctx = AppContext::with_store(AppConfig::default(), store);
        assert_eq!(ctx.theme.current(), Theme::Dark);
        let events = ctx.recorder().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].theme, Theme::Dark);
    }

    #[test]
    fn test_client_shares_recorder_and_gateway() {
        let ctx = AppContext::with_store(AppConfig::default(), MemoryStore::shared());
        assert!(Arc::ptr_eq(&ctx.client.recorder(), &ctx.recorder));
        assert_eq!(
            ctx.client.inner().gateway().base_url(),
            "http://localhost:8000/api"
        );
    }
}

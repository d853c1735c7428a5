//! In-memory implementation of [`SettingsRepository`].

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use powerhub_app::ports::SettingsRepository;
use powerhub_domain::error::PowerHubError;
use powerhub_domain::settings::Settings;

/// Holds the settings singleton.
#[derive(Debug, Default)]
pub struct MemorySettingsRepository {
    settings: RwLock<Settings>,
}

impl MemorySettingsRepository {
    /// Start from the given settings instead of the defaults.
    #[must_use]
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

impl SettingsRepository for MemorySettingsRepository {
    fn get(&self) -> impl Future<Output = Result<Settings, PowerHubError>> + Send {
        let current = self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        async { Ok(current) }
    }

    fn save(
        &self,
        settings: Settings,
    ) -> impl Future<Output = Result<Settings, PowerHubError>> + Send {
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings.clone();
        async { Ok(settings) }
    }
}

//! Settings service: read and save the energy budget.

use powerhub_domain::error::PowerHubError;
use powerhub_domain::event::{Event, EventType};
use powerhub_domain::settings::{Settings, SettingsUpdate};

use crate::ports::{EventPublisher, SettingsRepository};

/// Application service for the [`Settings`] singleton.
pub struct SettingsService<SR, EP> {
    repo: SR,
    publisher: EP,
}

impl<SR: SettingsRepository, EP: EventPublisher> SettingsService<SR, EP> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: SR, publisher: EP) -> Self {
        Self { repo, publisher }
    }

    /// Current settings.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn get_settings(&self) -> Result<Settings, PowerHubError> {
        self.repo.get().await
    }

    /// Apply `update` on top of the current settings and store the result.
    ///
    /// Absent fields keep their current value. Devices already on stay on
    /// even if the new cap is below the current draw.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn save_settings(&self, update: SettingsUpdate) -> Result<Settings, PowerHubError> {
        let mut settings = self.repo.get().await?;
        settings.apply(update);
        let saved = self.repo.save(settings).await?;

        tracing::info!(max_energy = saved.max_energy, peak_hours = %saved.peak_hours, "settings saved");
        let event = Event::new(
            EventType::SettingsSaved,
            None,
            serde_json::json!({
                "max_energy": saved.max_energy,
                "peak_hours": saved.peak_hours,
            }),
        );
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(error = %err, "failed to publish settings event");
        }
        Ok(saved)
    }
}

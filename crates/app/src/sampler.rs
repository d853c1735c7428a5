//! Consumption sampler: appends one chart point per tick.
//!
//! The sampler reads the device registry on a fixed interval, pushes the
//! total drawn power into a rolling [`ConsumptionSeries`], and publishes a
//! [`ConsumptionSampled`](EventType::ConsumptionSampled) event so that
//! dashboards know to redraw.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use powerhub_domain::admission;
use powerhub_domain::consumption::{ConsumptionSample, ConsumptionSeries};
use powerhub_domain::error::PowerHubError;
use powerhub_domain::event::{Event, EventType};
use powerhub_domain::time::now;

use crate::ports::{DeviceRepository, EventPublisher};

/// Periodic sampler of aggregate power draw.
pub struct ConsumptionSampler<DR, EP> {
    devices: DR,
    publisher: EP,
    interval: Duration,
    started: Instant,
    series: RwLock<ConsumptionSeries>,
}

impl<DR, EP> ConsumptionSampler<DR, EP>
where
    DR: DeviceRepository + Send + Sync,
    EP: EventPublisher + Send + Sync,
{
    /// Create a sampler keeping `history` points, ticking every `interval`.
    pub fn new(devices: DR, publisher: EP, interval: Duration, history: usize) -> Self {
        Self {
            devices,
            publisher,
            interval,
            started: Instant::now(),
            series: RwLock::new(ConsumptionSeries::new(history)),
        }
    }

    /// Copy of the current window, oldest sample first.
    #[must_use]
    pub fn snapshot(&self) -> ConsumptionSeries {
        self.series
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take one sample right away.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn sample_now(&self) -> Result<ConsumptionSample, PowerHubError> {
        let devices = self.devices.get_all().await?;
        let sample = ConsumptionSample {
            label: format!("{}s", self.started.elapsed().as_secs()),
            watts: admission::total_drawn(&devices),
            recorded_at: now(),
        };
        self.series
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample.clone());

        let event = Event::new(
            EventType::ConsumptionSampled,
            None,
            serde_json::json!({ "label": sample.label, "watts": sample.watts }),
        );
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(error = %err, "failed to publish consumption sample");
        }
        Ok(sample)
    }

    /// Sample on every tick until `shutdown` is cancelled.
    ///
    /// The first sample is taken one interval after the call.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval = ?self.interval, "consumption sampler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.sample_now().await {
                        Ok(sample) => tracing::trace!(watts = sample.watts, label = %sample.label, "sampled"),
                        Err(err) => tracing::warn!(error = %err, "consumption sampling failed"),
                    }
                }
                () = shutdown.cancelled() => {
                    tracing::info!("consumption sampler stopped");
                    break;
                }
            }
        }
    }
}

//! Recent auto-off messages for the dashboard banner.
//!
//! Form submissions report their outcome through the PRG redirect, but an
//! auto-off fires in the background. The dashboard learns about it by
//! following the event bus and showing the message for a short while.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use powerhub_domain::event::{Event, EventType};
use powerhub_domain::time::Timestamp;

/// How long an auto-off message stays on the dashboard.
pub const DEFAULT_NOTICE_TTL_SECONDS: i64 = 10;

const DEFAULT_CAPACITY: usize = 5;

/// Bounded list of recently fired auto-off messages.
pub struct RecentNotices {
    capacity: usize,
    ttl: chrono::Duration,
    entries: Mutex<VecDeque<(Timestamp, String)>>,
}

impl Default for RecentNotices {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_NOTICE_TTL_SECONDS)
    }
}

impl RecentNotices {
    #[must_use]
    pub fn new(capacity: usize, ttl_seconds: i64) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl: chrono::Duration::seconds(ttl_seconds),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, at: Timestamp, message: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back((at, message.into()));
    }

    /// Messages recorded less than the TTL before `at`, oldest first.
    #[must_use]
    pub fn active(&self, at: Timestamp) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .filter(|(recorded, _)| at - *recorded < self.ttl)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Keep the list fed from `rx` until the bus closes.
    pub fn follow(self: &Arc<Self>, mut rx: broadcast::Receiver<Event>) -> JoinHandle<()> {
        let notices = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => notices.observe(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "notice listener lagged, some events were dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn observe(&self, event: &Event) {
        if event.event_type != EventType::AutoOffFired {
            return;
        }
        if let Some(message) = event.data.get("message").and_then(|m| m.as_str()) {
            self.record(event.timestamp, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerhub_app::event_bus::InProcessEventBus;
    use powerhub_app::ports::EventPublisher;
    use powerhub_domain::id::DeviceId;
    use powerhub_domain::time::now;

    #[test]
    fn should_expire_messages_after_ttl() {
        let notices = RecentNotices::new(5, 10);
        let at = now();
        notices.record(at, "Time is up for Heater.");

        assert_eq!(notices.active(at + chrono::Duration::seconds(9)).len(), 1);
        assert!(notices.active(at + chrono::Duration::seconds(10)).is_empty());
    }

    #[test]
    fn should_keep_only_the_latest_messages() {
        let notices = RecentNotices::new(2, 60);
        let at = now();
        notices.record(at, "one");
        notices.record(at, "two");
        notices.record(at, "three");
        assert_eq!(notices.active(at), vec!["two", "three"]);
    }

    #[tokio::test]
    async fn should_collect_auto_off_messages_from_bus() {
        let bus = InProcessEventBus::new(8);
        let notices = Arc::new(RecentNotices::default());
        let task = notices.follow(bus.subscribe());

        bus.publish(Event::new(
            EventType::DevicePoweredOn,
            Some(DeviceId::new()),
            serde_json::json!({ "name": "Heater" }),
        ))
        .await
        .unwrap();
        bus.publish(Event::new(
            EventType::AutoOffFired,
            Some(DeviceId::new()),
            serde_json::json!({ "name": "Heater", "message": "Time is up for Heater." }),
        ))
        .await
        .unwrap();
        drop(bus);
        task.await.unwrap();

        assert_eq!(notices.active(now()), vec!["Time is up for Heater."]);
    }
}

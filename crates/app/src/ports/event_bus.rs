//! Event bus port: publish/subscribe for state-change notifications.

use std::future::Future;

use powerhub_domain::error::PowerHubError;
use powerhub_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PowerHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        (**self).publish(event)
    }
}

//! Event bus port: publish/subscribe for device events.

use std::future::Future;

use workcell_domain::error::WorkcellError;
use workcell_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WorkcellError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WorkcellError>> + Send {
        (**self).publish(event)
    }
}

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::domain::order::{OrderRecord, TransitionEvent};
use super::subscriber::Subscriber;

// ============================================================================
// Subscriber Registry + Notifier
// ============================================================================
//
// Ordered, identity-deduplicated set of subscribers. Broadcasting walks the
// set in attachment order and isolates every subscriber call: an error or a
// panic in one subscriber is recorded and the loop moves on.
//
// ============================================================================

#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Vec<Arc<dyn Subscriber>>,
}

/// A subscriber that failed to handle an event
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFailure {
    pub subscriber: String,
    pub error: String,
}

/// Result of one broadcast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastReport {
    /// Subscribers that handled the event, in delivery order
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

impl BroadcastReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_subscribers(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.subscriber.as_str()).collect()
    }

    /// Number of subscribers the event was handed to
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when this exact instance is already attached
    pub fn attach(&mut self, subscriber: Arc<dyn Subscriber>) -> bool {
        if self.contains(&subscriber) {
            return false;
        }

        tracing::info!(subscriber = %subscriber.identify(), "Subscribed");
        self.subscribers.push(subscriber);
        true
    }

    /// Returns false when the instance was not attached
    pub fn detach(&mut self, subscriber: &Arc<dyn Subscriber>) -> bool {
        let Some(index) = self.position(subscriber) else {
            return false;
        };

        let removed = self.subscribers.remove(index);
        tracing::info!(subscriber = %removed.identify(), "Unsubscribed");
        true
    }

    pub fn contains(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        self.position(subscriber).is_some()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Subscriber names in attachment order
    pub fn identities(&self) -> Vec<String> {
        self.subscribers.iter().map(|s| s.identify()).collect()
    }

    /// Deliver `event` to every subscriber in attachment order.
    ///
    /// Returns once every subscriber has been invoked exactly once.
    pub fn broadcast(&self, order: &OrderRecord, event: &TransitionEvent) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        tracing::debug!(
            order_id = %event.order_id,
            sequence = event.sequence,
            state = %event.new_state,
            subscribers = self.subscribers.len(),
            "Broadcasting order event"
        );

        for subscriber in &self.subscribers {
            let name = subscriber.identify();
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber.receive(order, event)));

            let error = match outcome {
                Ok(Ok(())) => {
                    report.delivered.push(name);
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(panic) => panic_message(panic.as_ref()),
            };

            tracing::warn!(
                order_id = %event.order_id,
                subscriber = %name,
                error = %error,
                "Subscriber failed to handle order event"
            );
            report.failed.push(DeliveryFailure { subscriber: name, error });
        }

        report
    }

    fn position(&self, subscriber: &Arc<dyn Subscriber>) -> Option<usize> {
        self.subscribers
            .iter()
            .position(|s| Arc::ptr_eq(s, subscriber))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

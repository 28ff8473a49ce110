use crate::domain::order::{OrderRecord, TransitionEvent};

// ============================================================================
// Subscriber Abstraction
// ============================================================================
//
// Anything that wants to hear about an order's lifecycle implements this.
// Subscribers keep their own private state behind `&self` (interior
// mutability) so one instance can be shared between several orders.
//
// ============================================================================

pub trait Subscriber: Send + Sync {
    /// React to one event. An `Err` is logged and reported by the notifier
    /// but never stops delivery to the other subscribers.
    fn receive(&self, order: &OrderRecord, event: &TransitionEvent) -> anyhow::Result<()>;

    /// Human-readable name for logs and failure reports
    fn identify(&self) -> String;
}

// ============================================================================
// Restaurant Order Tracking
// ============================================================================
//
// An order moves through a fixed lifecycle (pending, preparing, ready,
// served, completed, cancelled) and every change is broadcast to the
// kitchen, the waiter and the customer.
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod metrics;
pub mod notification;

pub use config::{NotificationConfig, TrackerConfig, TrackingConfig};
pub use domain::order::{
    Dish, LifecycleState, OrderCommand, OrderError, OrderId, OrderRecord, OrderStateMachine,
    OrderTracker, Settlement, StatusSummary, Transition, TransitionEvent, TransitionReceipt,
};
pub use metrics::Metrics;
pub use notification::{
    BroadcastReport, CustomerNotifier, KitchenDisplay, Subscriber, SubscriberRegistry,
    WaiterNotifier,
};

// ============================================================================
// Notification Module
// ============================================================================
//
// Fan-out of order lifecycle events to independent subscribers.
//
// Structure:
// - subscriber - The Subscriber trait every reactor implements
// - registry   - Ordered subscriber set and the broadcast loop
// - kitchen / waiter / customer - Concrete subscribers
//
// ============================================================================

mod customer;
mod kitchen;
mod registry;
mod subscriber;
mod waiter;

pub use customer::{mask_phone, CustomerMessage, CustomerNotifier};
pub use kitchen::{KitchenDisplay, KitchenTicket};
pub use registry::{BroadcastReport, DeliveryFailure, SubscriberRegistry};
pub use subscriber::Subscriber;
pub use waiter::WaiterNotifier;

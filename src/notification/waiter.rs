use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;

use crate::domain::order::{LifecycleState, OrderRecord, TransitionEvent};
use super::subscriber::Subscriber;

// ============================================================================
// Waiter Notification
// ============================================================================

/// Front-of-house pager. Counts every event it is handed and turns each one
/// into an advisory for the waiter.
pub struct WaiterNotifier {
    waiter_name: String,
    notification_count: AtomicU64,
    advisories: Mutex<Vec<String>>,
}

impl WaiterNotifier {
    pub fn new(waiter_name: impl Into<String>) -> Self {
        Self {
            waiter_name: waiter_name.into(),
            notification_count: AtomicU64::new(0),
            advisories: Mutex::new(Vec::new()),
        }
    }

    pub fn notification_count(&self) -> u64 {
        self.notification_count.load(Ordering::Relaxed)
    }

    pub fn advisories(&self) -> Vec<String> {
        self.advisories.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn advise(order: &OrderRecord, event: &TransitionEvent) -> String {
        let id = event.order_id;

        if !event.accepted {
            return format!("Request on order {} was refused: {}", id, event.message);
        }

        match event.new_state {
            LifecycleState::Pending => {
                format!("New order {} received. Confirm order details with customer", id)
            }
            LifecycleState::Preparing => match order.composition().cooking_time_minutes {
                Some(minutes) => format!(
                    "Order {} sent to kitchen. Estimated wait: {} minutes. \
                     Inform customer about wait time",
                    id, minutes
                ),
                None => format!("Order {} sent to kitchen. Inform customer about wait time", id),
            },
            LifecycleState::Ready => {
                format!("Order {} is ready for pickup! Collect from kitchen pass and serve", id)
            }
            LifecycleState::Served => {
                format!("Order {} served to customer. Check back if they need anything", id)
            }
            LifecycleState::Completed => {
                format!("Order {} completed and paid. Thank the customer", id)
            }
            LifecycleState::Cancelled => {
                format!("Order {} has been cancelled. Apologize to customer if needed", id)
            }
        }
    }
}

impl Default for WaiterNotifier {
    fn default() -> Self {
        Self::new("Server")
    }
}

impl Subscriber for WaiterNotifier {
    fn receive(&self, order: &OrderRecord, event: &TransitionEvent) -> anyhow::Result<()> {
        let count = self.notification_count.fetch_add(1, Ordering::Relaxed) + 1;
        let advisory = Self::advise(order, event);

        tracing::info!(
            waiter = %self.waiter_name,
            order_id = %event.order_id,
            state = %event.new_state,
            notifications = count,
            "{}", advisory
        );

        self.advisories
            .lock()
            .map_err(|_| anyhow!("waiter advisory lock poisoned"))?
            .push(advisory);

        Ok(())
    }

    fn identify(&self) -> String {
        format!("Waiter - {}", self.waiter_name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Dish, OrderCommand, OrderStateMachine};

    #[test]
    fn test_counter_increments_per_event() {
        let waiter = WaiterNotifier::new("Marco");
        let order = OrderRecord::new(Dish::new("Penne").with_cooking_time(9));
        let mut machine = OrderStateMachine::new(order);

        let announce = TransitionEvent::announced(machine.order().id(), 0, LifecycleState::Pending);
        waiter.receive(machine.order(), &announce).unwrap();

        let transition = machine.place_order().unwrap();
        let order_id = machine.order().id();
        let placed = TransitionEvent::attempted(order_id, 1, OrderCommand::PlaceOrder, &transition);
        waiter.receive(machine.order(), &placed).unwrap();

        assert_eq!(waiter.notification_count(), 2);
        let advisories = waiter.advisories();
        assert!(advisories[0].contains("New order"));
        assert!(advisories[1].contains("Estimated wait: 9 minutes"));
    }

    #[test]
    fn test_rejection_advisory() {
        let waiter = WaiterNotifier::default();
        let order = OrderRecord::new(Dish::new("Spaghetti"));
        let event = TransitionEvent::rejected(
            order.id(),
            1,
            OrderCommand::ServeOrder,
            LifecycleState::Pending,
            "order must be prepared first",
        );

        waiter.receive(&order, &event).unwrap();

        assert!(waiter.advisories()[0].contains("refused"));
        assert_eq!(waiter.identify(), "Waiter - Server");
    }
}

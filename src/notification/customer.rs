use std::sync::Mutex;

use anyhow::anyhow;

use crate::config::NotificationConfig;
use crate::domain::order::{LifecycleState, OrderId, OrderRecord, TransitionEvent};
use super::subscriber::Subscriber;

// ============================================================================
// Customer Notification
// ============================================================================
//
// Formats the SMS/app message a customer would get on each status change.
// The phone number never leaves this type unmasked.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerMessage {
    pub order_id: OrderId,
    /// Masked destination, e.g. `***-4567`
    pub recipient: String,
    pub body: String,
}

pub struct CustomerNotifier {
    customer_name: String,
    phone: String,
    config: NotificationConfig,
    outbox: Mutex<Vec<CustomerMessage>>,
}

impl CustomerNotifier {
    pub fn new(
        customer_name: impl Into<String>,
        phone: impl Into<String>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            phone: phone.into(),
            config,
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// Messages sent so far, oldest first
    pub fn messages(&self) -> Vec<CustomerMessage> {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn masked_phone(&self) -> String {
        mask_phone(&self.phone)
    }

    fn compose(&self, order: &OrderRecord, state: LifecycleState) -> String {
        let name = &self.customer_name;
        let id = order.id();

        match state {
            LifecycleState::Pending => {
                format!("Hi {}! Order {} received. We're processing your order...", name, id)
            }
            LifecycleState::Preparing => {
                let eta = order
                    .composition()
                    .cooking_time_minutes
                    .unwrap_or(self.config.fallback_eta_minutes);
                format!(
                    "Good news {}! Your order is being prepared. Estimated time: ~{} min",
                    name, eta
                )
            }
            LifecycleState::Ready => {
                format!("{}, your order is ready! Please come to the counter.", name)
            }
            LifecycleState::Served => {
                format!("Bon appétit, {}! Your meal has been served.", name)
            }
            LifecycleState::Completed => {
                format!("Thank you, {}! Order {} completed. Hope to see you again soon!", name, id)
            }
            LifecycleState::Cancelled => format!(
                "Order {} cancelled. Sorry for any inconvenience. Contact us: {}",
                id, self.config.support_phone
            ),
        }
    }
}

impl Subscriber for CustomerNotifier {
    fn receive(&self, order: &OrderRecord, event: &TransitionEvent) -> anyhow::Result<()> {
        // Customers only hear about real status changes
        if !event.is_state_change() {
            return Ok(());
        }

        let message = CustomerMessage {
            order_id: event.order_id,
            recipient: self.masked_phone(),
            body: self.compose(order, event.new_state),
        };

        tracing::info!(
            customer = %self.customer_name,
            recipient = %message.recipient,
            order_id = %event.order_id,
            state = %event.new_state,
            "Customer notified"
        );

        self.outbox
            .lock()
            .map_err(|_| anyhow!("customer outbox lock poisoned"))?
            .push(message);

        Ok(())
    }

    fn identify(&self) -> String {
        format!("Customer Notification - {}", self.customer_name)
    }
}

/// Keep only the last four digits of a phone number
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() >= 7 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***-{}", tail)
    } else {
        "***-****".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Dish, OrderCommand, OrderStateMachine};

    fn notifier() -> CustomerNotifier {
        CustomerNotifier::new("Alice", "555-867-5309", NotificationConfig::default())
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("555-867-5309"), "***-5309");
        assert_eq!(mask_phone("5551234"), "***-1234");
        assert_eq!(mask_phone("12345"), "***-****");
        assert_eq!(mask_phone(""), "***-****");
    }

    #[test]
    fn test_message_never_contains_full_phone() {
        let customer = notifier();
        let order = OrderRecord::new(Dish::new("Penne"));
        let event = TransitionEvent::announced(order.id(), 0, LifecycleState::Pending);

        customer.receive(&order, &event).unwrap();

        let messages = customer.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].recipient, "***-5309");
        assert!(!messages[0].body.contains("555-867-5309"));
        assert!(messages[0].body.contains("Alice"));
    }

    #[test]
    fn test_preparing_eta_falls_back_to_config() {
        let config = NotificationConfig {
            fallback_eta_minutes: 25,
            ..NotificationConfig::default()
        };
        let customer = CustomerNotifier::new("Bob", "5550000", config);
        let mut machine = OrderStateMachine::new(OrderRecord::new(Dish::new("Lasagna")));

        let transition = machine.place_order().unwrap();
        let order_id = machine.order().id();
        let event = TransitionEvent::attempted(order_id, 1, OrderCommand::PlaceOrder, &transition);
        customer.receive(machine.order(), &event).unwrap();

        assert!(customer.messages()[0].body.contains("~25 min"));
    }

    #[test]
    fn test_preparing_eta_uses_cooking_time() {
        let customer = notifier();
        let order = OrderRecord::new(Dish::new("Penne").with_cooking_time(11));
        let mut machine = OrderStateMachine::new(order);

        let transition = machine.place_order().unwrap();
        let order_id = machine.order().id();
        let event = TransitionEvent::attempted(order_id, 1, OrderCommand::PlaceOrder, &transition);
        customer.receive(machine.order(), &event).unwrap();

        assert!(customer.messages()[0].body.contains("~11 min"));
    }

    #[test]
    fn test_cancelled_message_carries_support_phone() {
        let customer = notifier();
        let mut machine = OrderStateMachine::new(OrderRecord::new(Dish::new("Penne")));

        let transition = machine.cancel_order().unwrap();
        let order_id = machine.order().id();
        let event = TransitionEvent::attempted(order_id, 1, OrderCommand::CancelOrder, &transition);
        customer.receive(machine.order(), &event).unwrap();

        let body = &customer.messages()[0].body;
        assert!(body.contains("cancelled"));
        assert!(body.contains(&NotificationConfig::default().support_phone));
    }

    #[test]
    fn test_rejections_are_not_sent_to_customer() {
        let customer = notifier();
        let order = OrderRecord::new(Dish::new("Penne"));
        let event = TransitionEvent::rejected(
            order.id(),
            1,
            OrderCommand::CompleteOrder,
            LifecycleState::Pending,
            "order must be placed and served first",
        );

        customer.receive(&order, &event).unwrap();
        assert!(customer.messages().is_empty());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commands::OrderCommand;
use super::value_objects::{LifecycleState, OrderId};

// ============================================================================
// Transition Events - what subscribers are told
// ============================================================================

/// One attempted (or announced) lifecycle change of an order.
///
/// Events are transient: they are built for a broadcast and dropped once
/// every subscriber has seen them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub order_id: OrderId,
    /// Position in this order's event stream, starting at 0
    pub sequence: u64,
    /// `None` for the announcement, otherwise the operation attempted
    pub operation: Option<OrderCommand>,
    /// `None` only for the announcement of a freshly created order
    pub previous_state: Option<LifecycleState>,
    pub new_state: LifecycleState,
    pub message: String,
    pub accepted: bool,
    pub occurred_at: DateTime<Utc>,
}

impl TransitionEvent {
    pub(crate) fn announced(order_id: OrderId, sequence: u64, state: LifecycleState) -> Self {
        Self {
            order_id,
            sequence,
            operation: None,
            previous_state: None,
            new_state: state,
            message: "Order received".to_string(),
            accepted: true,
            occurred_at: Utc::now(),
        }
    }

    pub(crate) fn attempted(
        order_id: OrderId,
        sequence: u64,
        operation: OrderCommand,
        transition: &Transition,
    ) -> Self {
        Self {
            order_id,
            sequence,
            operation: Some(operation),
            previous_state: Some(transition.from()),
            new_state: transition.to(),
            message: transition.message().to_string(),
            accepted: true,
            occurred_at: Utc::now(),
        }
    }

    pub(crate) fn rejected(
        order_id: OrderId,
        sequence: u64,
        operation: OrderCommand,
        state: LifecycleState,
        reason: &str,
    ) -> Self {
        Self {
            order_id,
            sequence,
            operation: Some(operation),
            previous_state: Some(state),
            new_state: state,
            message: reason.to_string(),
            accepted: false,
            occurred_at: Utc::now(),
        }
    }

    /// True when the status actually moved
    pub fn is_state_change(&self) -> bool {
        self.accepted && self.previous_state != Some(self.new_state)
    }
}

/// Successful outcome of a lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The status moved from `from` to `to`
    Moved {
        from: LifecycleState,
        to: LifecycleState,
        message: &'static str,
    },
    /// The order already sits where the operation would take it
    Unchanged {
        state: LifecycleState,
        message: &'static str,
    },
}

impl Transition {
    pub fn from(&self) -> LifecycleState {
        match self {
            Transition::Moved { from, .. } => *from,
            Transition::Unchanged { state, .. } => *state,
        }
    }

    pub fn to(&self) -> LifecycleState {
        match self {
            Transition::Moved { to, .. } => *to,
            Transition::Unchanged { state, .. } => *state,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Transition::Moved { message, .. } | Transition::Unchanged { message, .. } => *message,
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }

    /// Metric label for the outcome
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Transition::Moved { .. } => "transitioned",
            Transition::Unchanged { .. } => "unchanged",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempted_event_from_move() {
        let order_id = OrderId::new();
        let transition = Transition::Moved {
            from: LifecycleState::Pending,
            to: LifecycleState::Preparing,
            message: "Order placed",
        };

        let event = TransitionEvent::attempted(order_id, 1, OrderCommand::PlaceOrder, &transition);

        assert_eq!(event.previous_state, Some(LifecycleState::Pending));
        assert_eq!(event.new_state, LifecycleState::Preparing);
        assert!(event.accepted);
        assert!(event.is_state_change());
    }

    #[test]
    fn test_unchanged_event_is_not_state_change() {
        let transition = Transition::Unchanged {
            state: LifecycleState::Served,
            message: "Already served",
        };

        let event =
            TransitionEvent::attempted(OrderId::new(), 4, OrderCommand::ServeOrder, &transition);

        assert!(event.accepted);
        assert!(!event.is_state_change());
    }

    #[test]
    fn test_rejected_event() {
        let event = TransitionEvent::rejected(
            OrderId::new(),
            2,
            OrderCommand::CancelOrder,
            LifecycleState::Served,
            "already served",
        );

        assert!(!event.accepted);
        assert_eq!(event.new_state, LifecycleState::Served);
        assert!(!event.is_state_change());
    }

    #[test]
    fn test_announcement_has_no_previous_state() {
        let event = TransitionEvent::announced(OrderId::new(), 0, LifecycleState::Pending);
        assert_eq!(event.sequence, 0);
        assert_eq!(event.previous_state, None);
        assert_eq!(event.operation, None);
    }

    #[test]
    fn test_event_serialization() {
        let event = TransitionEvent::announced(OrderId::new(), 0, LifecycleState::Pending);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["new_state"], "Pending");
        assert_eq!(json["accepted"], true);
        assert!(json["previous_state"].is_null());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::Transition;
use super::value_objects::{Dish, LifecycleState, OrderId};

// ============================================================================
// Order Record - identity and composition of one order
// ============================================================================

/// The order as handed over by the ordering front end.
///
/// Identity and composition are fixed at construction. The status is only
/// ever written by [`OrderStateMachine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    id: OrderId,
    created_at: DateTime<Utc>,
    composition: Dish,
    status: LifecycleState,
}

impl OrderRecord {
    pub fn new(composition: Dish) -> Self {
        Self {
            id: OrderId::new(),
            created_at: Utc::now(),
            composition,
            status: LifecycleState::Pending,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn composition(&self) -> &Dish {
        &self.composition
    }

    pub fn status(&self) -> LifecycleState {
        self.status
    }
}

// ============================================================================
// Transition Table
// ============================================================================

/// What the table says about one (state, operation) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Advance(LifecycleState, &'static str),
    Stay(&'static str),
    Reject(&'static str),
}

/// The complete lifecycle table. Every cell is spelled out so adding a state
/// or an operation fails to compile until it is decided.
fn decide(state: LifecycleState, command: OrderCommand) -> Decision {
    use Decision::*;
    use LifecycleState as S;
    use OrderCommand as C;

    match (state, command) {
        (S::Pending, C::PlaceOrder) => {
            Advance(S::Preparing, "Order placed and sent to the kitchen")
        }
        (S::Pending, C::PrepareOrder) => Reject("order must be placed first"),
        (S::Pending, C::CompletePreparation) => Reject("order hasn't been started yet"),
        (S::Pending, C::ServeOrder) => Reject("order must be prepared first"),
        (S::Pending, C::CompleteOrder) => Reject("order must be placed and served first"),
        (S::Pending, C::CancelOrder) => Advance(S::Cancelled, "Order cancelled before placement"),

        (S::Preparing, C::PlaceOrder) => Reject("order is already placed and being prepared"),
        (S::Preparing, C::PrepareOrder) => Stay("Order is already being prepared in the kitchen"),
        (S::Preparing, C::CompletePreparation) => {
            Advance(S::Ready, "Order preparation complete, moving to serving station")
        }
        (S::Preparing, C::ServeOrder) => Reject("order is still being prepared"),
        (S::Preparing, C::CompleteOrder) => Reject("order must be served first"),
        (S::Preparing, C::CancelOrder) => {
            Advance(S::Cancelled, "Order cancelled during preparation, discarding ingredients")
        }

        (S::Ready, C::PlaceOrder) => Reject("order is already placed and ready"),
        (S::Ready, C::PrepareOrder) => Reject("order preparation is already complete"),
        (S::Ready, C::CompletePreparation) => Stay("Order is already ready for serving"),
        (S::Ready, C::ServeOrder) => Advance(S::Served, "Order served to customer"),
        (S::Ready, C::CompleteOrder) => Reject("order must be served first"),
        (S::Ready, C::CancelOrder) => {
            Advance(S::Cancelled, "Order cancelled after preparation, food will be discarded")
        }

        (S::Served, C::PlaceOrder) => Reject("order is already placed and served"),
        (S::Served, C::PrepareOrder) => Reject("order is already prepared and served"),
        (S::Served, C::CompletePreparation) => Reject("order preparation was already completed"),
        (S::Served, C::ServeOrder) => Stay("Order is already served to customer"),
        (S::Served, C::CompleteOrder) => {
            Advance(S::Completed, "Payment processed, order completed")
        }
        (S::Served, C::CancelOrder) => {
            Reject("order was already served to customer; contact a manager for a refund")
        }

        (S::Completed, C::CompleteOrder) => Stay("Order was already completed"),
        (S::Completed, C::CancelOrder) => {
            Reject("order is completed; contact a manager for a refund")
        }
        (S::Completed, _) => Reject("order is already completed"),

        (S::Cancelled, C::CancelOrder) => Stay("Order is already cancelled"),
        (S::Cancelled, _) => Reject("order was cancelled"),
    }
}

// ============================================================================
// Order State Machine
// ============================================================================

/// Owns one [`OrderRecord`] and moves it through the lifecycle table
#[derive(Debug, Clone)]
pub struct OrderStateMachine {
    order: OrderRecord,
}

impl OrderStateMachine {
    /// Wrap a freshly assembled order. The machine always starts at `Pending`
    /// regardless of what the record carried.
    pub fn new(mut order: OrderRecord) -> Self {
        order.status = LifecycleState::Pending;
        Self { order }
    }

    pub fn order(&self) -> &OrderRecord {
        &self.order
    }

    pub fn current_state(&self) -> LifecycleState {
        self.order.status
    }

    pub fn current_state_id(&self) -> &'static str {
        self.order.status.id()
    }

    pub fn status_summary(&self) -> StatusSummary {
        StatusSummary {
            order_id: self.order.id,
            created_at: self.order.created_at,
            state: self.order.status,
        }
    }

    pub fn place_order(&mut self) -> Result<Transition, OrderError> {
        self.apply(OrderCommand::PlaceOrder)
    }

    pub fn prepare_order(&mut self) -> Result<Transition, OrderError> {
        self.apply(OrderCommand::PrepareOrder)
    }

    pub fn complete_preparation(&mut self) -> Result<Transition, OrderError> {
        self.apply(OrderCommand::CompletePreparation)
    }

    pub fn serve_order(&mut self) -> Result<Transition, OrderError> {
        self.apply(OrderCommand::ServeOrder)
    }

    pub fn complete_order(&mut self) -> Result<Transition, OrderError> {
        self.apply(OrderCommand::CompleteOrder)
    }

    pub fn cancel_order(&mut self) -> Result<Transition, OrderError> {
        self.apply(OrderCommand::CancelOrder)
    }

    /// Run one operation against the table
    pub fn apply(&mut self, command: OrderCommand) -> Result<Transition, OrderError> {
        let state = self.order.status;

        match decide(state, command) {
            Decision::Advance(next, message) => {
                self.order.status = next;
                tracing::debug!(
                    order_id = %self.order.id,
                    from = %state,
                    to = %next,
                    command = command.label(),
                    "Order state changed"
                );
                Ok(Transition::Moved { from: state, to: next, message })
            }
            Decision::Stay(message) => {
                tracing::debug!(
                    order_id = %self.order.id,
                    state = %state,
                    command = command.label(),
                    "Operation already satisfied"
                );
                Ok(Transition::Unchanged { state, message })
            }
            Decision::Reject(reason) => Err(OrderError::IllegalTransition {
                state,
                command,
                reason,
            }),
        }
    }
}

/// Point-in-time view of an order for textual rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
    pub state: LifecycleState,
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order ID: {}", self.order_id)?;
        writeln!(f, "Created:  {}", self.created_at.format("%Y-%m-%d %H:%M:%S"))?;
        write!(f, "Status:   {} {}", self.state.symbol(), self.state)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

use std::sync::Mutex;

use anyhow::anyhow;

use crate::domain::order::{Dish, LifecycleState, OrderId, OrderRecord, TransitionEvent};
use super::subscriber::Subscriber;

// ============================================================================
// Kitchen Display
// ============================================================================
//
// Keeps the list of orders currently on the line. The queue is a display
// aid only; the state machine never consults it.
//
// ============================================================================

/// What the chef sees when an order hits the line
#[derive(Debug, Clone, PartialEq)]
pub struct KitchenTicket {
    pub order_id: OrderId,
    pub dish: Dish,
}

#[derive(Default)]
pub struct KitchenDisplay {
    queue: Mutex<Vec<OrderId>>,
    tickets: Mutex<Vec<KitchenTicket>>,
}

impl KitchenDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders currently being prepared, oldest first
    pub fn queue(&self) -> Vec<OrderId> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn active_orders(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Every ticket printed since the display started
    pub fn tickets(&self) -> Vec<KitchenTicket> {
        self.tickets.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Subscriber for KitchenDisplay {
    fn receive(&self, order: &OrderRecord, event: &TransitionEvent) -> anyhow::Result<()> {
        if !event.is_state_change() {
            return Ok(());
        }

        let order_id = event.order_id;
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| anyhow!("kitchen queue lock poisoned"))?;

        match event.new_state {
            LifecycleState::Preparing => {
                if !queue.contains(&order_id) {
                    queue.push(order_id);
                }

                let dish = order.composition().clone();
                tracing::info!(
                    order_id = %order_id,
                    dish = %dish,
                    cooking_time_minutes = ?dish.cooking_time_minutes,
                    "Order added to kitchen queue"
                );

                self.tickets
                    .lock()
                    .map_err(|_| anyhow!("kitchen ticket lock poisoned"))?
                    .push(KitchenTicket { order_id, dish });
            }
            LifecycleState::Ready => {
                queue.retain(|id| *id != order_id);
                tracing::info!(order_id = %order_id, "Order ready at the pass");
            }
            LifecycleState::Cancelled => {
                if let Some(index) = queue.iter().position(|id| *id == order_id) {
                    queue.remove(index);
                    tracing::info!(order_id = %order_id, "Order cancelled, stop preparation");
                }
            }
            _ => {}
        }

        if !queue.is_empty() {
            tracing::debug!(active_orders = queue.len(), "Kitchen queue");
        }

        Ok(())
    }

    fn identify(&self) -> String {
        "Kitchen Display System".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

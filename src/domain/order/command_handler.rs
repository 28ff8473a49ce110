use std::sync::Arc;
use std::time::Instant;

use crate::config::TrackingConfig;
use crate::metrics::Metrics;
use crate::notification::{BroadcastReport, Subscriber, SubscriberRegistry};

use super::aggregate::{OrderRecord, OrderStateMachine, StatusSummary};
use super::commands::OrderCommand;
use super::errors::OrderError;
use super::events::{Transition, TransitionEvent};
use super::value_objects::LifecycleState;

// ============================================================================
// Order Tracker
// ============================================================================
//
// Orchestrates: Operation → State Machine → Event → Subscribers
//
// One tracker follows one order for the length of its tracking session.
// Every call is synchronous: by the time an operation returns, every
// subscriber has already seen the resulting event.
//
// ============================================================================

/// What a successful operation produced
#[derive(Debug, Clone)]
pub struct TransitionReceipt {
    pub transition: Transition,
    /// The event sent to subscribers, if one was sent
    pub event: Option<TransitionEvent>,
    pub broadcast: Option<BroadcastReport>,
}

impl TransitionReceipt {
    pub fn was_broadcast(&self) -> bool {
        self.broadcast.is_some()
    }
}

/// Outcome of handing a payment result to the tracker
#[derive(Debug, Clone)]
pub enum Settlement {
    Completed(TransitionReceipt),
    /// Payment failed; the order is left where it was
    Declined,
}

pub struct OrderTracker {
    machine: OrderStateMachine,
    subscribers: SubscriberRegistry,
    config: TrackingConfig,
    metrics: Option<Arc<Metrics>>,
    next_sequence: u64,
}

impl OrderTracker {
    pub fn new(order: OrderRecord, config: TrackingConfig) -> Self {
        tracing::info!(
            order_id = %order.id(),
            dish = %order.composition(),
            "Tracking new order"
        );

        Self {
            machine: OrderStateMachine::new(order),
            subscribers: SubscriberRegistry::new(),
            config,
            metrics: None,
            next_sequence: 0,
        }
    }

    /// Report to `metrics`. A registry attached earlier is released first,
    /// so the open-orders gauge counts this order once.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        let open = !self.machine.current_state().is_terminal();
        if let Some(previous) = self.metrics.take() {
            if open {
                previous.order_closed();
            }
        }
        if open {
            metrics.order_opened();
        }
        self.metrics = Some(metrics);
        self
    }

    // ------------------------------------------------------------------------
    // Subscribers
    // ------------------------------------------------------------------------

    pub fn attach(&mut self, subscriber: Arc<dyn Subscriber>) -> bool {
        self.subscribers.attach(subscriber)
    }

    pub fn detach(&mut self, subscriber: &Arc<dyn Subscriber>) -> bool {
        self.subscribers.detach(subscriber)
    }

    pub fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn order(&self) -> &OrderRecord {
        self.machine.order()
    }

    pub fn current_state(&self) -> LifecycleState {
        self.machine.current_state()
    }

    pub fn current_state_id(&self) -> &'static str {
        self.machine.current_state_id()
    }

    pub fn status_summary(&self) -> StatusSummary {
        self.machine.status_summary()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Tell subscribers the order exists, with no previous state.
    ///
    /// Only the first event of the stream may be an announcement: returns
    /// `None` once anything has been broadcast for this order.
    pub fn announce(&mut self) -> Option<BroadcastReport> {
        if self.next_sequence > 0 {
            tracing::debug!(
                order_id = %self.order().id(),
                state = %self.current_state(),
                "Announcement skipped, order already has events"
            );
            return None;
        }

        let event = TransitionEvent::announced(
            self.order().id(),
            self.take_sequence(),
            self.current_state(),
        );
        Some(self.broadcast(&event))
    }

    pub fn place_order(&mut self) -> Result<TransitionReceipt, OrderError> {
        self.execute(OrderCommand::PlaceOrder)
    }

    pub fn prepare_order(&mut self) -> Result<TransitionReceipt, OrderError> {
        self.execute(OrderCommand::PrepareOrder)
    }

    pub fn complete_preparation(&mut self) -> Result<TransitionReceipt, OrderError> {
        self.execute(OrderCommand::CompletePreparation)
    }

    pub fn serve_order(&mut self) -> Result<TransitionReceipt, OrderError> {
        self.execute(OrderCommand::ServeOrder)
    }

    pub fn complete_order(&mut self) -> Result<TransitionReceipt, OrderError> {
        self.execute(OrderCommand::CompleteOrder)
    }

    pub fn cancel_order(&mut self) -> Result<TransitionReceipt, OrderError> {
        self.execute(OrderCommand::CancelOrder)
    }

    /// Close the order only when the external payment step succeeded
    pub fn settle_payment(&mut self, paid: bool) -> Result<Settlement, OrderError> {
        if !paid {
            tracing::warn!(
                order_id = %self.order().id(),
                state = %self.current_state(),
                "Payment declined, order left open"
            );
            return Ok(Settlement::Declined);
        }

        self.complete_order().map(Settlement::Completed)
    }

    /// Run one operation and broadcast its outcome according to the
    /// tracking configuration
    pub fn execute(&mut self, command: OrderCommand) -> Result<TransitionReceipt, OrderError> {
        match self.machine.apply(command) {
            Ok(transition) => {
                self.record_transition(command, transition.outcome_label());

                if transition.is_moved() && transition.to().is_terminal() {
                    if let Some(metrics) = &self.metrics {
                        metrics.order_closed();
                    }
                }

                let (event, broadcast) = if transition.is_moved() || self.config.rebroadcast_noops {
                    let event = TransitionEvent::attempted(
                        self.order().id(),
                        self.take_sequence(),
                        command,
                        &transition,
                    );
                    let report = self.broadcast(&event);
                    (Some(event), Some(report))
                } else {
                    (None, None)
                };

                tracing::info!(
                    order_id = %self.order().id(),
                    command = command.label(),
                    state = %self.current_state(),
                    "{}", transition.message()
                );

                Ok(TransitionReceipt { transition, event, broadcast })
            }
            Err(err) => {
                self.record_transition(command, "rejected");

                tracing::warn!(
                    order_id = %self.order().id(),
                    command = command.label(),
                    state = %err.state(),
                    reason = err.reason(),
                    "Operation rejected"
                );

                if self.config.broadcast_rejections {
                    let event = TransitionEvent::rejected(
                        self.order().id(),
                        self.take_sequence(),
                        command,
                        err.state(),
                        err.reason(),
                    );
                    self.broadcast(&event);
                }

                Err(err)
            }
        }
    }

    fn broadcast(&self, event: &TransitionEvent) -> BroadcastReport {
        let started = Instant::now();
        let report = self.subscribers.broadcast(self.machine.order(), event);

        if let Some(metrics) = &self.metrics {
            metrics.record_broadcast(
                report.delivered.len(),
                &report.failed_subscribers(),
                started.elapsed().as_secs_f64(),
            );
        }

        report
    }

    fn record_transition(&self, command: OrderCommand, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_transition(command.label(), outcome);
        }
    }

    fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }
}

impl Drop for OrderTracker {
    fn drop(&mut self) {
        // A session abandoned mid-lifecycle no longer counts as open
        if let Some(metrics) = &self.metrics {
            if !self.machine.current_state().is_terminal() {
                metrics.order_closed();
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

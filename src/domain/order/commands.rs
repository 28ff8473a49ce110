use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Order Commands - Lifecycle operations a caller can attempt
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder,
    PrepareOrder,
    CompletePreparation,
    ServeOrder,
    CompleteOrder,
    CancelOrder,
}

impl OrderCommand {
    pub const ALL: [OrderCommand; 6] = [
        OrderCommand::PlaceOrder,
        OrderCommand::PrepareOrder,
        OrderCommand::CompletePreparation,
        OrderCommand::ServeOrder,
        OrderCommand::CompleteOrder,
        OrderCommand::CancelOrder,
    ];

    /// Metric label and log field value
    pub fn label(&self) -> &'static str {
        match self {
            OrderCommand::PlaceOrder => "place_order",
            OrderCommand::PrepareOrder => "prepare_order",
            OrderCommand::CompletePreparation => "complete_preparation",
            OrderCommand::ServeOrder => "serve_order",
            OrderCommand::CompleteOrder => "complete_order",
            OrderCommand::CancelOrder => "cancel_order",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            OrderCommand::PlaceOrder => "place",
            OrderCommand::PrepareOrder => "prepare",
            OrderCommand::CompletePreparation => "complete preparation of",
            OrderCommand::ServeOrder => "serve",
            OrderCommand::CompleteOrder => "complete",
            OrderCommand::CancelOrder => "cancel",
        }
    }
}

impl fmt::Display for OrderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

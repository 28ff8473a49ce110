// ============================================================================
// Order Domain - Lifecycle of one restaurant order
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderId, Dish, LifecycleState)
// - Events (TransitionEvent, Transition)
// - Commands (PlaceOrder, ServeOrder, etc.)
// - Errors (OrderError enum)
// - Aggregate (OrderRecord and the lifecycle state machine)
// - Command Handler (OrderTracker, which drives the machine and notifies)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;

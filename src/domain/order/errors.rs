use super::commands::OrderCommand;
use super::value_objects::LifecycleState;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// The operation is not legal from the current state. The order is left
    /// exactly as it was.
    #[error("Cannot {command} order while {state}: {reason}")]
    IllegalTransition {
        state: LifecycleState,
        command: OrderCommand,
        reason: &'static str,
    },
}

impl OrderError {
    pub fn state(&self) -> LifecycleState {
        match self {
            OrderError::IllegalTransition { state, .. } => *state,
        }
    }

    pub fn command(&self) -> OrderCommand {
        match self {
            OrderError::IllegalTransition { command, .. } => *command,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::IllegalTransition { reason, .. } => *reason,
        }
    }
}

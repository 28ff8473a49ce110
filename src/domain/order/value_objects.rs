use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Unique order identifier, assigned once when the record is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Time-ordered id, unique for the lifetime of the process
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ORD-{}", self.0.simple())
    }
}

/// What the kitchen actually cooks. Built by the ordering front end and
/// carried through the lifecycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub sauce: Option<String>,
    pub cooking_time_minutes: Option<u32>,
    pub modifiers: Vec<String>,
}

impl Dish {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sauce: None,
            cooking_time_minutes: None,
            modifiers: Vec::new(),
        }
    }

    pub fn with_sauce(mut self, sauce: impl Into<String>) -> Self {
        self.sauce = Some(sauce.into());
        self
    }

    pub fn with_cooking_time(mut self, minutes: u32) -> Self {
        self.cooking_time_minutes = Some(minutes);
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(sauce) = &self.sauce {
            write!(f, " with {} sauce", sauce)?;
        }
        if !self.modifiers.is_empty() {
            write!(f, " + {}", self.modifiers.join(", "))?;
        }
        Ok(())
    }
}

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Pending,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 6] = [
        LifecycleState::Pending,
        LifecycleState::Preparing,
        LifecycleState::Ready,
        LifecycleState::Served,
        LifecycleState::Completed,
        LifecycleState::Cancelled,
    ];

    /// Stable tag for routing and display lookups
    pub fn id(&self) -> &'static str {
        match self {
            LifecycleState::Pending => "pending",
            LifecycleState::Preparing => "preparing",
            LifecycleState::Ready => "ready",
            LifecycleState::Served => "served",
            LifecycleState::Completed => "completed",
            LifecycleState::Cancelled => "cancelled",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Pending => "Pending",
            LifecycleState::Preparing => "Preparing",
            LifecycleState::Ready => "Ready",
            LifecycleState::Served => "Served",
            LifecycleState::Completed => "Completed",
            LifecycleState::Cancelled => "Cancelled",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LifecycleState::Pending => "⏳",
            LifecycleState::Preparing => "👨‍🍳",
            LifecycleState::Ready => "✅",
            LifecycleState::Served => "🍽️",
            LifecycleState::Completed => "✔️",
            LifecycleState::Cancelled => "🚫",
        }
    }

    /// No operation leaves a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Completed | LifecycleState::Cancelled)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

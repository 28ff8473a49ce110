// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Domain-specific rules live here. Fan-out to subscribers is in
// src/notification/ and knows nothing about the transition table.
//
// ============================================================================

pub mod order;

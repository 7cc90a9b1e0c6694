//! State management for orders.
//!
//! This module provides the state machine that validates payment status
//! transitions and persists orders through the storage service.

pub mod order;

pub use order::{OrderStateError, OrderStateMachine};

//! Core order logic for the food order service.
//!
//! Ties together order storage and payment verification to run the order
//! lifecycle: creation with a fresh identifier, payment of pending orders and
//! status lookup. The builder composes the service from configuration.

pub mod builder;
pub mod error;
pub mod id;
pub mod service;
pub mod state;

pub use builder::{BuilderError, OrderFactories, OrderServiceBuilder};
pub use error::OrderServiceError;
pub use id::{generate_order_id, is_valid_order_id, IdGenerator, RandomIdGenerator};
pub use service::OrderService;
pub use state::{OrderStateError, OrderStateMachine};

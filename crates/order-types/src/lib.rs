//! Common types module for the food order service.
//!
//! This module defines the core data types and structures shared by every
//! crate in the workspace: the persisted order record, HTTP request and
//! response bodies, storage keys and configuration validation helpers.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Order record and payment status types.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Storage types for managing persistent data.
pub mod storage;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use storage::*;
pub use validation::*;

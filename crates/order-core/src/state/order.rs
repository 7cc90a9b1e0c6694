//! Order state machine implementation.
//!
//! Orders start as `pending` and may move to `completed` or `failed`; both
//! are terminal. Every read and write of an order goes through here.

use order_storage::{StorageError, StorageService};
use order_types::{Order, PaymentStatus, StorageKey};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition {
		from: PaymentStatus,
		to: PaymentStatus,
	},
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Order already exists: {0}")]
	AlreadyExists(String),
}

impl OrderStateError {
	fn from_storage(order_id: &str, err: StorageError) -> Self {
		match err {
			StorageError::NotFound => OrderStateError::OrderNotFound(order_id.to_string()),
			StorageError::AlreadyExists(_) => OrderStateError::AlreadyExists(order_id.to_string()),
			other => OrderStateError::Storage(other.to_string()),
		}
	}
}

/// Manages order state transitions and persistence.
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Checks if a state transition is valid.
	pub fn is_valid_transition(from: PaymentStatus, to: PaymentStatus) -> bool {
		matches!(
			(from, to),
			(PaymentStatus::Pending, PaymentStatus::Completed)
				| (PaymentStatus::Pending, PaymentStatus::Failed)
		)
	}

	/// Gets an order by ID.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderStateError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| OrderStateError::from_storage(order_id, e))
	}

	/// Stores a new order, failing if its ID is already taken.
	pub async fn create_order(&self, order: &Order) -> Result<(), OrderStateError> {
		self.storage
			.insert(StorageKey::Orders.as_str(), &order.order_id, order)
			.await
			.map_err(|e| OrderStateError::from_storage(&order.order_id, e))
	}

	/// Transitions an order to a new status with validation.
	pub async fn transition_order_status(
		&self,
		order_id: &str,
		new_status: PaymentStatus,
	) -> Result<Order, OrderStateError> {
		let mut order = self.get_order(order_id).await?;

		if !Self::is_valid_transition(order.payment_status, new_status) {
			return Err(OrderStateError::InvalidTransition {
				from: order.payment_status,
				to: new_status,
			});
		}

		order.payment_status = new_status;
		self.storage
			.update(StorageKey::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| OrderStateError::from_storage(order_id, e))?;

		tracing::debug!(order_id = %order_id, status = %new_status, "Order status updated");
		Ok(order)
	}
}

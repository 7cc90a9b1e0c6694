//! Errors returned by the order service and their HTTP mapping.

use order_types::{APIError, PAYMENT_FAILED_MESSAGE};
use thiserror::Error;

use crate::state::OrderStateError;

/// Seconds a client should wait before retrying when the gateway is down.
const PAYMENT_RETRY_AFTER_SECS: u64 = 5;

/// Errors that can occur while creating, paying for or looking up orders.
#[derive(Debug, Error)]
pub enum OrderServiceError {
	/// A required field is missing or empty.
	#[error("{0}")]
	InvalidRequest(String),
	/// No order matches the query.
	#[error("{0}")]
	OrderNotFound(String),
	/// The payment gateway declined the payment. The order stays pending.
	#[error("Payment declined for order {0}")]
	PaymentDeclined(String),
	/// The payment gateway could not be reached.
	#[error("Payment gateway unavailable: {0}")]
	PaymentUnavailable(String),
	/// Every generated identifier collided with an existing order.
	#[error("No free order identifier after {0} attempts")]
	IdentifierExhausted(u32),
	/// The order store failed.
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<OrderStateError> for OrderServiceError {
	fn from(err: OrderStateError) -> Self {
		match err {
			OrderStateError::OrderNotFound(_) => {
				OrderServiceError::OrderNotFound("Order not found".to_string())
			},
			OrderStateError::Storage(msg) => OrderServiceError::Storage(msg),
			other => OrderServiceError::Storage(other.to_string()),
		}
	}
}

impl From<OrderServiceError> for APIError {
	fn from(err: OrderServiceError) -> Self {
		match err {
			OrderServiceError::InvalidRequest(message) => APIError::BadRequest {
				error_type: "INVALID_REQUEST".to_string(),
				message,
				details: None,
			},
			OrderServiceError::OrderNotFound(message) => APIError::NotFound {
				error_type: "ORDER_NOT_FOUND".to_string(),
				message,
			},
			OrderServiceError::PaymentDeclined(order_id) => APIError::BadRequest {
				error_type: "PAYMENT_DECLINED".to_string(),
				message: PAYMENT_FAILED_MESSAGE.to_string(),
				details: Some(serde_json::json!({ "order_id": order_id })),
			},
			OrderServiceError::PaymentUnavailable(message) => APIError::ServiceUnavailable {
				error_type: "PAYMENT_UNAVAILABLE".to_string(),
				message,
				retry_after: Some(PAYMENT_RETRY_AFTER_SECS),
			},
			e @ OrderServiceError::IdentifierExhausted(_) => APIError::InternalServerError {
				error_type: "ORDER_ID_EXHAUSTED".to_string(),
				message: e.to_string(),
			},
			OrderServiceError::Storage(_) => APIError::InternalServerError {
				error_type: "STORAGE_ERROR".to_string(),
				message: "Failed to access order storage".to_string(),
			},
		}
	}
}

//! API types for the food order HTTP API.
//!
//! This module defines the request and response bodies of the three
//! endpoints together with the structured error type every handler returns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Order, PaymentStatus};

/// Message returned when an order has been created.
pub const ORDER_CREATED_MESSAGE: &str = "Order created successfully";
/// Message returned when a payment has been verified.
pub const PAYMENT_SUCCESS_MESSAGE: &str = "Payment successful";
/// Message returned when a payment has been declined.
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed";

/// Request body for `POST /order`.
///
/// Fields are optional at the serde level so that a missing field is
/// reported as an invalid request rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	#[serde(default)]
	pub food_item: Option<String>,
	#[serde(default)]
	pub upi_id: Option<String>,
}

/// Response body for `POST /order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
	pub message: String,
	pub order_id: String,
}

/// Request body for `POST /payment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
	#[serde(default)]
	pub order_id: Option<String>,
	#[serde(default)]
	pub upi_id: Option<String>,
}

/// Response body for a successful `POST /payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
	pub message: String,
	pub order_id: String,
	pub food_item: String,
}

/// Response body for `GET /order/status/{order_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusResponse {
	pub order_id: String,
	pub food_item: String,
	pub upi_id: String,
	pub payment_status: PaymentStatus,
}

impl From<Order> for OrderStatusResponse {
	fn from(order: Order) -> Self {
		Self {
			order_id: order.order_id,
			food_item: order.food_item,
			upi_id: order.upi_id,
			payment_status: order.payment_status,
		}
	}
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Additional error context
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
	/// Suggested retry delay in seconds
	#[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
	pub retry_after: Option<u64>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Bad request: missing fields, malformed body, declined payment (400)
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// No record matches the query (404)
	NotFound { error_type: String, message: String },
	/// Service unavailable with optional retry information (503)
	ServiceUnavailable {
		error_type: String,
		message: String,
		retry_after: Option<u64>,
	},
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::NotFound { .. } => 404,
			APIError::ServiceUnavailable { .. } => 503,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::BadRequest {
				error_type,
				message,
				details,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: details.clone(),
				retry_after: None,
			},
			APIError::NotFound {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: None,
			},
			APIError::ServiceUnavailable {
				error_type,
				message,
				retry_after,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
				retry_after: *retry_after,
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::ServiceUnavailable { message, .. } => {
				write!(f, "Service Unavailable: {}", message)
			},
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		let error_response = self.to_error_response();
		(status, Json(error_response)).into_response()
	}
}

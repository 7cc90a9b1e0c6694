//! Order types for the food order service.
//!
//! An order is the only persisted entity. It is created in the `pending`
//! state and is only ever moved forward by the payment flow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A food order together with its payment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Unique 8-character identifier (uppercase letters and digits).
	pub order_id: String,
	/// Food item requested by the client.
	pub food_item: String,
	/// UPI identifier the order must be paid from.
	pub upi_id: String,
	/// Current payment status of the order.
	pub payment_status: PaymentStatus,
}

impl Order {
	/// Creates a new order in the `pending` state.
	pub fn new(
		order_id: impl Into<String>,
		food_item: impl Into<String>,
		upi_id: impl Into<String>,
	) -> Self {
		Self {
			order_id: order_id.into(),
			food_item: food_item.into(),
			upi_id: upi_id.into(),
			payment_status: PaymentStatus::Pending,
		}
	}

	/// Returns true if this order can still be paid with the given UPI id.
	pub fn is_payable_by(&self, upi_id: &str) -> bool {
		self.payment_status == PaymentStatus::Pending && self.upi_id == upi_id
	}
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	/// Order created, payment not yet confirmed.
	Pending,
	/// Payment verified.
	Completed,
	/// Terminal failure state. Declined payments do not move an order here.
	Failed,
}

impl PaymentStatus {
	/// Returns the string representation used on the wire and in storage.
	pub fn as_str(&self) -> &'static str {
		match self {
			PaymentStatus::Pending => "pending",
			PaymentStatus::Completed => "completed",
			PaymentStatus::Failed => "failed",
		}
	}
}

impl fmt::Display for PaymentStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_order_is_pending() {
		let order = Order::new("AB12CD34", "Burger", "user@upi");
		assert_eq!(order.payment_status, PaymentStatus::Pending);
		assert!(order.is_payable_by("user@upi"));
		assert!(!order.is_payable_by("other@upi"));
	}

	#[test]
	fn test_completed_order_is_not_payable() {
		let mut order = Order::new("AB12CD34", "Burger", "user@upi");
		order.payment_status = PaymentStatus::Completed;
		assert!(!order.is_payable_by("user@upi"));
	}

	#[test]
	fn test_status_serializes_lowercase() {
		let order = Order::new("AB12CD34", "Burger", "user@upi");
		let json = serde_json::to_value(&order).unwrap();
		assert_eq!(json["payment_status"], "pending");
		assert_eq!(json["order_id"], "AB12CD34");
		assert_eq!(json["food_item"], "Burger");
		assert_eq!(json["upi_id"], "user@upi");
	}

	#[test]
	fn test_status_display_matches_wire_format() {
		for status in [PaymentStatus::Pending, PaymentStatus::Completed, PaymentStatus::Failed] {
			let json = serde_json::to_value(status).unwrap();
			assert_eq!(json, status.to_string());
		}
	}
}

//! Payment verification module for the food order service.
//!
//! Orders are paid through an external UPI gateway. This crate hides that
//! gateway behind the [`PaymentVerifier`] trait so the order logic never
//! depends on a concrete integration. The shipped implementations simulate
//! the gateway: `random` approves with a configured probability and `fixed`
//! always gives the same answer.

use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod fixed;
	pub mod random;
}

/// Errors that can occur while talking to a payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
	/// The gateway could not be reached or did not answer in time.
	#[error("Gateway unavailable: {0}")]
	Unavailable(String),
	/// Error that occurs when the verifier configuration is invalid.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Outcome of a payment verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDecision {
	Approved,
	Declined,
}

impl PaymentDecision {
	pub fn is_approved(&self) -> bool {
		matches!(self, PaymentDecision::Approved)
	}
}

/// Trait defining the interface for payment verification.
///
/// A verifier answers whether the payment for `order_id` from `upi_id` went
/// through. A declined payment is a normal answer, not an error; errors are
/// reserved for the gateway itself failing.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
	/// Returns the configuration schema for this verifier.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Verifies the payment of an order.
	async fn verify(&self, upi_id: &str, order_id: &str) -> Result<PaymentDecision, PaymentError>;
}

/// Type alias for payment verifier factory functions.
pub type PaymentFactory = fn(&toml::Value) -> Result<Box<dyn PaymentVerifier>, PaymentError>;

/// Registry trait for payment verifier implementations.
pub trait PaymentRegistry: ImplementationRegistry<Factory = PaymentFactory> {}

/// Get all registered payment verifier implementations.
pub fn get_all_implementations() -> Vec<(&'static str, PaymentFactory)> {
	use implementations::{fixed, random};

	vec![
		(random::Registry::NAME, random::Registry::factory()),
		(fixed::Registry::NAME, fixed::Registry::factory()),
	]
}

/// Service that manages payment verification.
///
/// Wraps the configured verifier and logs every decision.
pub struct PaymentService {
	verifier: Box<dyn PaymentVerifier>,
}

impl PaymentService {
	/// Creates a new PaymentService with the given verifier.
	pub fn new(verifier: Box<dyn PaymentVerifier>) -> Self {
		Self { verifier }
	}

	/// Verifies the payment of an order through the configured verifier.
	pub async fn verify(
		&self,
		upi_id: &str,
		order_id: &str,
	) -> Result<PaymentDecision, PaymentError> {
		match self.verifier.verify(upi_id, order_id).await {
			Ok(decision) => {
				tracing::info!(order_id = %order_id, decision = ?decision, "Payment verified");
				Ok(decision)
			},
			Err(e) => {
				tracing::warn!(order_id = %order_id, error = %e, "Payment verification failed");
				Err(e)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::fixed::FixedVerifier;

	#[tokio::test]
	async fn test_service_forwards_decision() {
		let service = PaymentService::new(Box::new(FixedVerifier::new(false)));
		let decision = service.verify("user@upi", "AB12CD34").await.unwrap();
		assert_eq!(decision, PaymentDecision::Declined);
		assert!(!decision.is_approved());
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["random", "fixed"]);
	}
}

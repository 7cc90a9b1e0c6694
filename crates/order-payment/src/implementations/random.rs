//! Coin-flip payment verifier.
//!
//! Stands in for a real UPI gateway: every verification is an independent
//! draw that approves with probability `success_rate`.

use crate::{PaymentDecision, PaymentError, PaymentVerifier};
use async_trait::async_trait;
use order_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use rand::Rng;

/// Default approval probability.
const DEFAULT_SUCCESS_RATE: f64 = 0.5;

/// Verifier that approves payments at random.
pub struct RandomVerifier {
	/// Probability in `[0.0, 1.0]` that a payment is approved.
	success_rate: f64,
}

impl RandomVerifier {
	/// Creates a verifier with the given approval probability.
	pub fn new(success_rate: f64) -> Result<Self, PaymentError> {
		if !(0.0..=1.0).contains(&success_rate) {
			return Err(PaymentError::InvalidConfig(format!(
				"success_rate must be between 0.0 and 1.0, got {}",
				success_rate
			)));
		}
		Ok(Self { success_rate })
	}

	pub fn success_rate(&self) -> f64 {
		self.success_rate
	}
}

impl Default for RandomVerifier {
	fn default() -> Self {
		Self {
			success_rate: DEFAULT_SUCCESS_RATE,
		}
	}
}

/// Configuration schema for RandomVerifier.
pub struct RandomVerifierSchema;

impl ConfigSchema for RandomVerifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"success_rate",
				FieldType::Float {
					min: Some(0.0),
					max: Some(1.0),
				},
			)],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl PaymentVerifier for RandomVerifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(RandomVerifierSchema)
	}

	async fn verify(&self, _upi_id: &str, order_id: &str) -> Result<PaymentDecision, PaymentError> {
		let approved = rand::thread_rng().gen_bool(self.success_rate);
		tracing::debug!(order_id = %order_id, approved, "Simulated gateway response");

		Ok(if approved {
			PaymentDecision::Approved
		} else {
			PaymentDecision::Declined
		})
	}
}

/// Factory function to create a random verifier from configuration.
///
/// Configuration parameters:
/// - `success_rate`: Approval probability between 0.0 and 1.0 (default: 0.5)
pub fn create_verifier(config: &toml::Value) -> Result<Box<dyn PaymentVerifier>, PaymentError> {
	RandomVerifierSchema
		.validate(config)
		.map_err(|e| PaymentError::InvalidConfig(e.to_string()))?;

	let success_rate = config
		.get("success_rate")
		.and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
		.unwrap_or(DEFAULT_SUCCESS_RATE);

	Ok(Box::new(RandomVerifier::new(success_rate)?))
}

/// Registry for the random verifier implementation.
pub struct Registry;

impl order_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "random";
	type Factory = crate::PaymentFactory;

	fn factory() -> Self::Factory {
		create_verifier
	}
}

impl crate::PaymentRegistry for Registry {}

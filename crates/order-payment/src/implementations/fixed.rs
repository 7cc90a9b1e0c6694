//! Payment verifier with a fixed answer.
//!
//! Useful for staging environments and tests that need a deterministic
//! gateway.

use crate::{PaymentDecision, PaymentError, PaymentVerifier};
use async_trait::async_trait;
use order_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};

/// Verifier that always approves or always declines.
pub struct FixedVerifier {
	approve: bool,
}

impl FixedVerifier {
	pub fn new(approve: bool) -> Self {
		Self { approve }
	}
}

/// Configuration schema for FixedVerifier.
pub struct FixedVerifierSchema;

impl ConfigSchema for FixedVerifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![Field::new("approve", FieldType::Boolean)]).validate(config)
	}
}

#[async_trait]
impl PaymentVerifier for FixedVerifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FixedVerifierSchema)
	}

	async fn verify(&self, _upi_id: &str, _order_id: &str) -> Result<PaymentDecision, PaymentError> {
		Ok(if self.approve {
			PaymentDecision::Approved
		} else {
			PaymentDecision::Declined
		})
	}
}

/// Factory function to create a fixed verifier from configuration.
///
/// Configuration parameters:
/// - `approve`: Whether every payment is approved (default: true)
pub fn create_verifier(config: &toml::Value) -> Result<Box<dyn PaymentVerifier>, PaymentError> {
	FixedVerifierSchema
		.validate(config)
		.map_err(|e| PaymentError::InvalidConfig(e.to_string()))?;

	let approve = config
		.get("approve")
		.and_then(|v| v.as_bool())
		.unwrap_or(true);

	Ok(Box::new(FixedVerifier::new(approve)))
}

/// Registry for the fixed verifier implementation.
pub struct Registry;

impl order_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "fixed";
	type Factory = crate::PaymentFactory;

	fn factory() -> Self::Factory {
		create_verifier
	}
}

impl crate::PaymentRegistry for Registry {}

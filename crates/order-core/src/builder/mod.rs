//! Builder for constructing the order service.
//!
//! Composes an [`OrderService`] from pluggable storage and payment
//! implementations using factory functions keyed by implementation name.
//! Only the `primary` implementation of each component is instantiated.

use crate::service::OrderService;
use order_config::Config;
use order_payment::{PaymentFactory, PaymentService};
use order_storage::{StorageFactory, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during service construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions for each pluggable component, keyed by implementation name.
pub struct OrderFactories {
	pub storage_factories: HashMap<String, StorageFactory>,
	pub payment_factories: HashMap<String, PaymentFactory>,
}

impl OrderFactories {
	/// Collects every implementation shipped with the storage and payment crates.
	pub fn registered() -> Self {
		Self {
			storage_factories: order_storage::get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
			payment_factories: order_payment::get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}
}

/// Looks up the primary implementation's config table and factory.
fn select_primary<'a, F>(
	component: &str,
	primary: &str,
	implementations: &'a HashMap<String, toml::Value>,
	factories: &'a HashMap<String, F>,
) -> Result<(&'a toml::Value, &'a F), BuilderError> {
	let config = implementations.get(primary).ok_or_else(|| {
		BuilderError::Config(format!(
			"Primary {} '{}' has no configuration section",
			component, primary
		))
	})?;
	let factory = factories.get(primary).ok_or_else(|| {
		BuilderError::MissingComponent(format!(
			"No {} implementation named '{}' is registered",
			component, primary
		))
	})?;
	Ok((config, factory))
}

/// Builder for constructing an [`OrderService`] with pluggable implementations.
pub struct OrderServiceBuilder {
	config: Config,
}

impl OrderServiceBuilder {
	/// Creates a new OrderServiceBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the OrderService from the primary storage and payment implementations.
	pub fn build(self, factories: OrderFactories) -> Result<OrderService, BuilderError> {
		let (storage_config, storage_factory) = select_primary(
			"storage",
			&self.config.storage.primary,
			&self.config.storage.implementations,
			&factories.storage_factories,
		)?;
		let storage_backend = storage_factory(storage_config).map_err(|e| {
			tracing::error!(
				component = "storage",
				implementation = %self.config.storage.primary,
				error = %e,
				"Failed to create storage implementation"
			);
			BuilderError::Config(format!(
				"Failed to create storage implementation '{}': {}",
				self.config.storage.primary, e
			))
		})?;
		storage_backend
			.config_schema()
			.validate(storage_config)
			.map_err(|e| {
				tracing::error!(
					component = "storage",
					implementation = %self.config.storage.primary,
					error = %e,
					"Invalid configuration for storage implementation"
				);
				BuilderError::Config(format!(
					"Invalid configuration for storage implementation '{}': {}",
					self.config.storage.primary, e
				))
			})?;
		tracing::info!(component = "storage", implementation = %self.config.storage.primary, "Loaded");

		let (payment_config, payment_factory) = select_primary(
			"payment",
			&self.config.payment.primary,
			&self.config.payment.implementations,
			&factories.payment_factories,
		)?;
		let verifier = payment_factory(payment_config).map_err(|e| {
			tracing::error!(
				component = "payment",
				implementation = %self.config.payment.primary,
				error = %e,
				"Failed to create payment verifier"
			);
			BuilderError::Config(format!(
				"Failed to create payment verifier '{}': {}",
				self.config.payment.primary, e
			))
		})?;
		verifier
			.config_schema()
			.validate(payment_config)
			.map_err(|e| {
				tracing::error!(
					component = "payment",
					implementation = %self.config.payment.primary,
					error = %e,
					"Invalid configuration for payment verifier"
				);
				BuilderError::Config(format!(
					"Invalid configuration for payment verifier '{}': {}",
					self.config.payment.primary, e
				))
			})?;
		tracing::info!(component = "payment", implementation = %self.config.payment.primary, "Loaded");

		let storage = Arc::new(StorageService::new(storage_backend));
		let payment = Arc::new(PaymentService::new(verifier));

		Ok(OrderService::new(
			storage,
			payment,
			self.config.service.max_id_attempts,
		))
	}
}

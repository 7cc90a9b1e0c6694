//! Configuration builder for test and development configurations.

use crate::{ApiConfig, Config, PaymentConfig, ServiceConfig, StorageConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to in-memory storage and a verifier that approves every payment.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	max_id_attempts: u32,
	storage_primary: String,
	storage_config: toml::Value,
	payment_primary: String,
	payment_config: toml::Value,
	api: ApiConfig,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::map::Map::new())
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		Self {
			service_id: "test-orders".to_string(),
			max_id_attempts: 5,
			storage_primary: "memory".to_string(),
			storage_config: empty_table(),
			payment_primary: "fixed".to_string(),
			payment_config: empty_table(),
			api: ApiConfig::default(),
		}
	}

	/// Sets the service ID.
	pub fn service_id(mut self, id: impl Into<String>) -> Self {
		self.service_id = id.into();
		self
	}

	/// Sets the number of identifier attempts per order insert.
	pub fn max_id_attempts(mut self, attempts: u32) -> Self {
		self.max_id_attempts = attempts;
		self
	}

	/// Sets the primary storage implementation and its configuration table.
	pub fn storage(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		self.storage_primary = primary.into();
		self.storage_config = config;
		self
	}

	/// Sets the primary payment verifier and its configuration table.
	pub fn payment(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		self.payment_primary = primary.into();
		self.payment_config = config;
		self
	}

	/// Sets the API configuration.
	pub fn api(mut self, api: ApiConfig) -> Self {
		self.api = api;
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				id: self.service_id,
				max_id_attempts: self.max_id_attempts,
			},
			storage: StorageConfig {
				implementations: HashMap::from([(
					self.storage_primary.clone(),
					self.storage_config,
				)]),
				primary: self.storage_primary,
			},
			payment: PaymentConfig {
				implementations: HashMap::from([(
					self.payment_primary.clone(),
					self.payment_config,
				)]),
				primary: self.payment_primary,
			},
			api: self.api,
		}
	}
}

//! Storage module for the food order service.
//!
//! This module provides abstractions for persistent storage of orders,
//! supporting different backend implementations such as in-memory or
//! file-based storage.

use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs when inserting a key that is already present.
	#[error("Already exists: {0}")]
	AlreadyExists(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// This trait must be implemented by any storage backend that wants to
/// integrate with the order service. It provides basic key-value operations.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, creating or overwriting the key.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Stores raw bytes only if the key is absent.
	///
	/// Returns `StorageError::AlreadyExists` without touching the existing
	/// value when the key is taken.
	async fn insert_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must provide
/// to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level storage service that provides typed operations.
///
/// The StorageService wraps a low-level storage backend and provides
/// convenient methods for storing and retrieving typed data with
/// automatic JSON serialization.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: &str, id: &str) -> String {
		format!("{}:{}", namespace, id)
	}

	fn encode<T: Serialize>(data: &T) -> Result<Vec<u8>, StorageError> {
		serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Stores a serializable value only if nothing is stored under the id yet.
	pub async fn insert<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes = Self::encode(data)?;
		self.backend
			.insert_bytes(&Self::key(namespace, id), bytes)
			.await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Updates an existing value in storage.
	///
	/// Unlike `insert`, this returns `StorageError::NotFound` if the key
	/// doesn't exist.
	pub async fn update<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let key = Self::key(namespace, id);

		if !self.backend.exists(&key).await? {
			return Err(StorageError::NotFound);
		}

		let bytes = Self::encode(data)?;
		self.backend.set_bytes(&key, bytes).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use implementations::memory::MemoryStorage;
	use order_types::{Order, PaymentStatus, StorageKey};

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_typed_round_trip() {
		let storage = service();
		let order = Order::new("AAAA1111", "Dosa", "user@upi");

		storage
			.insert(StorageKey::Orders.as_str(), &order.order_id, &order)
			.await
			.unwrap();

		let loaded: Order = storage
			.retrieve(StorageKey::Orders.as_str(), "AAAA1111")
			.await
			.unwrap();
		assert_eq!(loaded, order);
	}

	#[tokio::test]
	async fn test_insert_does_not_overwrite() {
		let storage = service();
		let first = Order::new("AAAA1111", "Dosa", "user@upi");
		let second = Order::new("AAAA1111", "Idli", "other@upi");

		storage.insert("orders", "AAAA1111", &first).await.unwrap();
		let result = storage.insert("orders", "AAAA1111", &second).await;
		assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

		let loaded: Order = storage.retrieve("orders", "AAAA1111").await.unwrap();
		assert_eq!(loaded.food_item, "Dosa");
	}

	#[tokio::test]
	async fn test_update_requires_existing_key() {
		let storage = service();
		let mut order = Order::new("BBBB2222", "Thali", "user@upi");

		let result = storage.update("orders", "BBBB2222", &order).await;
		assert!(matches!(result, Err(StorageError::NotFound)));

		storage.insert("orders", "BBBB2222", &order).await.unwrap();
		order.payment_status = PaymentStatus::Completed;
		storage.update("orders", "BBBB2222", &order).await.unwrap();

		let loaded: Order = storage.retrieve("orders", "BBBB2222").await.unwrap();
		assert_eq!(loaded.payment_status, PaymentStatus::Completed);
	}

	#[tokio::test]
	async fn test_retrieve_wrong_shape_is_serialization_error() {
		let storage = service();
		storage.insert("orders", "CCCC3333", &"not an order").await.unwrap();

		let result: Result<Order, _> = storage.retrieve("orders", "CCCC3333").await;
		assert!(matches!(result, Err(StorageError::Serialization(_))));
	}

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}
}

//! In-memory storage backend.
//!
//! Useful for tests and local development where orders do not need to
//! survive a restart.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use order_types::{ConfigSchema, Schema, ValidationError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage implementation backed by a `HashMap`.
pub struct MemoryStorage {
	/// The in-memory store protected by a read-write lock.
	store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
	/// Creates a new, empty MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			store: Arc::new(RwLock::new(HashMap::new())),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let store = self.store.read().await;
		store.get(key).cloned().ok_or(StorageError::NotFound)
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.insert(key.to_string(), value);
		Ok(())
	}

	async fn insert_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		match store.entry(key.to_string()) {
			Entry::Occupied(_) => Err(StorageError::AlreadyExists(key.to_string())),
			Entry::Vacant(slot) => {
				slot.insert(value);
				Ok(())
			},
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let store = self.store.read().await;
		Ok(store.contains_key(key))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage has no configuration
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl order_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_basic_operations() {
		let storage = MemoryStorage::new();

		let key = "orders:AB12CD34";
		let value = b"{}".to_vec();
		storage.set_bytes(key, value.clone()).await.unwrap();
		assert_eq!(storage.get_bytes(key).await.unwrap(), value);
		assert!(storage.exists(key).await.unwrap());

		assert!(!storage.exists("orders:ZZ99ZZ99").await.unwrap());
		assert!(matches!(
			storage.get_bytes("orders:ZZ99ZZ99").await,
			Err(StorageError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_insert_rejects_existing_key() {
		let storage = MemoryStorage::new();

		storage.insert_bytes("orders:X", b"1".to_vec()).await.unwrap();
		let result = storage.insert_bytes("orders:X", b"2".to_vec()).await;

		assert!(matches!(result, Err(StorageError::AlreadyExists(ref k)) if k == "orders:X"));
		assert_eq!(storage.get_bytes("orders:X").await.unwrap(), b"1".to_vec());
	}

	#[test]
	fn test_factory_rejects_non_table_config() {
		assert!(create_storage(&toml::Value::Table(Default::default())).is_ok());
		assert!(matches!(
			create_storage(&toml::Value::Boolean(true)),
			Err(StorageError::Configuration(_))
		));
	}
}

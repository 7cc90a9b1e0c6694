//! File-based storage backend.
//!
//! Each record is stored as its own JSON file under a base directory, named
//! after the sanitized storage key (`orders:AB12CD34` -> `orders_AB12CD34.json`).

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use order_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

/// Default directory for order files.
const DEFAULT_STORAGE_PATH: &str = "./data/orders";

/// Distinguishes temp files written concurrently for the same key.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn backend_error(e: std::io::Error) -> StorageError {
	StorageError::Backend(e.to_string())
}

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at `base_path`.
	///
	/// The directory is not touched; use [`FileStorage::open`] to create it.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Creates the base directory if it is absent and returns the storage.
	pub fn open(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
		let base_path = base_path.as_ref().to_path_buf();
		std::fs::create_dir_all(&base_path).map_err(backend_error)?;
		tracing::debug!(path = %base_path.display(), "Opened file storage");
		Ok(Self::new(base_path))
	}

	/// Converts a storage key to a filesystem-safe file path.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', '\\', ':'], "_");
		self.base_path.join(format!("{}.json", safe_key))
	}

	/// Returns a fresh temp path next to `path`.
	fn temp_path(path: &Path) -> PathBuf {
		let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
		path.with_extension(format!("{}.{}.tmp", std::process::id(), n))
	}

	/// Writes `value` to a new temp file and returns its path.
	async fn write_temp(&self, path: &Path, value: &[u8]) -> Result<PathBuf, StorageError> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await.map_err(backend_error)?;
		}

		let temp_path = Self::temp_path(path);
		fs::write(&temp_path, value).await.map_err(backend_error)?;
		Ok(temp_path)
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(backend_error(e)),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		// Write atomically by writing to temp file then renaming
		let temp_path = self.write_temp(&path, &value).await?;
		if let Err(e) = fs::rename(&temp_path, &path).await {
			let _ = fs::remove_file(&temp_path).await;
			return Err(backend_error(e));
		}

		Ok(())
	}

	async fn insert_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		// Linking fails if the target exists, so a complete file appears
		// atomically or not at all.
		let temp_path = self.write_temp(&path, &value).await?;
		let linked = fs::hard_link(&temp_path, &path).await;

		if let Err(e) = fs::remove_file(&temp_path).await {
			tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
		}

		match linked {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == ErrorKind::AlreadyExists => {
				Err(StorageError::AlreadyExists(key.to_string()))
			},
			Err(e) => Err(backend_error(e)),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		fs::try_exists(&path).await.map_err(backend_error)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new("storage_path", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some(path) if path.trim().is_empty() => {
						Err("storage_path cannot be empty".to_string())
					},
					_ => Ok(()),
				}
			})],
		);

		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for order files (default: "./data/orders")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);

	Ok(Box::new(FileStorage::open(storage_path)?))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl order_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = crate::StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl crate::StorageRegistry for Registry {}

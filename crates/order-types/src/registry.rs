//! Registry trait for self-registering implementations.
//!
//! Every pluggable implementation (storage backends, payment verifiers)
//! registers itself under the name used in configuration files together with
//! its factory function.

/// Base trait for implementation registries.
///
/// Each implementation module must provide a `Registry` struct that
/// implements this trait, declaring its configuration name and factory.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This should match the key used in the TOML configuration, for example:
	/// - "file" for storage.implementations.file
	/// - "random" for payment.implementations.random
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}

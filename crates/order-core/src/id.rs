//! Order identifier generation.
//!
//! Identifiers are 8 characters drawn uniformly from `A-Z0-9`, giving
//! 36^8 (about 2.8e12) possible values. Collisions are possible and are
//! handled by the caller through insert-if-absent and regeneration.

use rand::Rng;

/// Number of characters in an order identifier.
pub const ORDER_ID_LENGTH: usize = 8;

/// Alphabet order identifiers are drawn from.
pub const ORDER_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of new order identifiers.
pub trait IdGenerator: Send + Sync {
	fn generate(&self) -> String;
}

/// Generates identifiers with the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
	fn generate(&self) -> String {
		generate_order_id()
	}
}

/// Returns a fresh random order identifier.
pub fn generate_order_id() -> String {
	let mut rng = rand::thread_rng();
	(0..ORDER_ID_LENGTH)
		.map(|_| ORDER_ID_ALPHABET[rng.gen_range(0..ORDER_ID_ALPHABET.len())] as char)
		.collect()
}

/// Returns true if `id` has the shape of a generated order identifier.
pub fn is_valid_order_id(id: &str) -> bool {
	id.len() == ORDER_ID_LENGTH && id.bytes().all(|b| ORDER_ID_ALPHABET.contains(&b))
}

//! Order lifecycle operations.
//!
//! [`OrderService`] validates requests, allocates identifiers, asks the
//! payment verifier for a decision and drives the order state machine.

use crate::error::OrderServiceError;
use crate::id::{is_valid_order_id, IdGenerator, RandomIdGenerator};
use crate::state::{OrderStateError, OrderStateMachine};
use order_payment::PaymentService;
use order_storage::StorageService;
use order_types::{Order, PaymentStatus};
use std::sync::Arc;

const CREATE_FIELDS_REQUIRED: &str = "Food item and UPI ID are required";
const PAYMENT_FIELDS_REQUIRED: &str = "Order ID and UPI ID are required";
const NO_PENDING_ORDER: &str = "No pending order found for this UPI ID and Order ID";
const ORDER_NOT_FOUND: &str = "Order not found";

/// Returns the value if it is present and not empty.
fn required(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

/// Creates orders, settles payments and answers status queries.
pub struct OrderService {
	state: OrderStateMachine,
	payment: Arc<PaymentService>,
	ids: Box<dyn IdGenerator>,
	max_id_attempts: u32,
}

impl OrderService {
	pub fn new(
		storage: Arc<StorageService>,
		payment: Arc<PaymentService>,
		max_id_attempts: u32,
	) -> Self {
		Self {
			state: OrderStateMachine::new(storage),
			payment,
			ids: Box::new(RandomIdGenerator),
			max_id_attempts: max_id_attempts.max(1),
		}
	}

	/// Replaces the identifier source.
	pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
		self.ids = ids;
		self
	}

	/// Creates a pending order.
	///
	/// A freshly generated identifier that is already taken is replaced with
	/// a new one, up to `max_id_attempts` times. Existing orders are never
	/// overwritten.
	pub async fn create_order(
		&self,
		food_item: Option<&str>,
		upi_id: Option<&str>,
	) -> Result<Order, OrderServiceError> {
		let (Some(food_item), Some(upi_id)) = (required(food_item), required(upi_id)) else {
			return Err(OrderServiceError::InvalidRequest(
				CREATE_FIELDS_REQUIRED.to_string(),
			));
		};

		for attempt in 1..=self.max_id_attempts {
			let order = Order::new(self.ids.generate(), food_item, upi_id);
			match self.state.create_order(&order).await {
				Ok(()) => {
					tracing::info!(order_id = %order.order_id, food_item = %order.food_item, "Order created");
					return Ok(order);
				},
				Err(OrderStateError::AlreadyExists(id)) => {
					tracing::debug!(order_id = %id, attempt, "Order identifier collision, regenerating");
				},
				Err(e) => return Err(e.into()),
			}
		}

		tracing::error!(
			attempts = self.max_id_attempts,
			"Could not allocate a free order identifier"
		);
		Err(OrderServiceError::IdentifierExhausted(self.max_id_attempts))
	}

	/// Pays for a pending order.
	///
	/// The order must exist, be pending and belong to `upi_id`. An approved
	/// payment completes the order. A declined payment leaves it pending so
	/// the client can try again.
	pub async fn process_payment(
		&self,
		order_id: Option<&str>,
		upi_id: Option<&str>,
	) -> Result<Order, OrderServiceError> {
		let (Some(order_id), Some(upi_id)) = (required(order_id), required(upi_id)) else {
			return Err(OrderServiceError::InvalidRequest(
				PAYMENT_FIELDS_REQUIRED.to_string(),
			));
		};

		// Malformed ids cannot name a stored order and may not be valid keys.
		if !is_valid_order_id(order_id) {
			return Err(no_pending_order());
		}

		let order = match self.state.get_order(order_id).await {
			Ok(order) => order,
			Err(OrderStateError::OrderNotFound(_)) => return Err(no_pending_order()),
			Err(e) => return Err(e.into()),
		};
		if !order.is_payable_by(upi_id) {
			tracing::debug!(
				order_id = %order_id,
				status = %order.payment_status,
				"Payment rejected, order not pending for this UPI ID"
			);
			return Err(no_pending_order());
		}

		let decision = self
			.payment
			.verify(upi_id, order_id)
			.await
			.map_err(|e| OrderServiceError::PaymentUnavailable(e.to_string()))?;
		if !decision.is_approved() {
			return Err(OrderServiceError::PaymentDeclined(order_id.to_string()));
		}

		match self
			.state
			.transition_order_status(order_id, PaymentStatus::Completed)
			.await
		{
			Ok(order) => {
				tracing::info!(order_id = %order_id, "Order paid");
				Ok(order)
			},
			// Lost a race with a concurrent payment of the same order.
			Err(OrderStateError::InvalidTransition { .. } | OrderStateError::OrderNotFound(_)) => {
				Err(no_pending_order())
			},
			Err(e) => Err(e.into()),
		}
	}

	/// Looks up an order by identifier.
	pub async fn get_order_status(&self, order_id: &str) -> Result<Order, OrderServiceError> {
		if !is_valid_order_id(order_id) {
			return Err(OrderServiceError::OrderNotFound(
				ORDER_NOT_FOUND.to_string(),
			));
		}

		match self.state.get_order(order_id).await {
			Ok(order) => Ok(order),
			Err(OrderStateError::OrderNotFound(_)) => Err(OrderServiceError::OrderNotFound(
				ORDER_NOT_FOUND.to_string(),
			)),
			Err(e) => Err(e.into()),
		}
	}
}

fn no_pending_order() -> OrderServiceError {
	OrderServiceError::OrderNotFound(NO_PENDING_ORDER.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use mockall::predicate::eq;
	use order_payment::implementations::fixed::FixedVerifier;
	use order_payment::{MockPaymentVerifier, PaymentDecision, PaymentError, PaymentVerifier};
	use order_storage::implementations::{file::FileStorage, memory::MemoryStorage};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use tempfile::TempDir;

	fn memory_storage() -> Arc<StorageService> {
		Arc::new(StorageService::new(Box::new(MemoryStorage::new())))
	}

	fn service_with(verifier: Box<dyn PaymentVerifier>) -> OrderService {
		OrderService::new(memory_storage(), Arc::new(PaymentService::new(verifier)), 5)
	}

	/// Hands out the given identifiers in order, repeating the last one.
	struct SequenceIds {
		ids: Vec<&'static str>,
		next: AtomicUsize,
	}

	impl SequenceIds {
		fn new(ids: Vec<&'static str>) -> Self {
			Self {
				ids,
				next: AtomicUsize::new(0),
			}
		}
	}

	impl IdGenerator for SequenceIds {
		fn generate(&self) -> String {
			let i = self.next.fetch_add(1, Ordering::SeqCst);
			self.ids[i.min(self.ids.len() - 1)].to_string()
		}
	}

	#[tokio::test]
	async fn test_create_order_is_pending() {
		let service = service_with(Box::new(FixedVerifier::new(true)));

		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();
		assert!(is_valid_order_id(&order.order_id));

		let stored = service.get_order_status(&order.order_id).await.unwrap();
		assert_eq!(stored.food_item, "Burger");
		assert_eq!(stored.upi_id, "user@upi");
		assert_eq!(stored.payment_status, PaymentStatus::Pending);
	}

	#[tokio::test]
	async fn test_create_order_requires_both_fields() {
		let service = service_with(Box::new(FixedVerifier::new(true)));

		for (food, upi) in [
			(None, Some("user@upi")),
			(Some("Burger"), None),
			(Some(""), Some("user@upi")),
			(Some("Burger"), Some("")),
		] {
			let err = service.create_order(food, upi).await.unwrap_err();
			assert!(
				matches!(err, OrderServiceError::InvalidRequest(ref m) if m == CREATE_FIELDS_REQUIRED)
			);
		}
	}

	/// Counts identifier requests; a rejected request must never get this far.
	#[derive(Clone, Default)]
	struct CountingIds(Arc<AtomicUsize>);

	impl IdGenerator for CountingIds {
		fn generate(&self) -> String {
			let n = self.0.fetch_add(1, Ordering::SeqCst);
			format!("CNT{:05}", n)
		}
	}

	#[tokio::test]
	async fn test_invalid_create_stores_nothing() {
		let storage = memory_storage();
		let ids = CountingIds::default();
		let service = OrderService::new(
			storage.clone(),
			Arc::new(PaymentService::new(Box::new(FixedVerifier::new(true)))),
			5,
		)
		.with_id_generator(Box::new(ids.clone()));

		for (food, upi) in [(Some(""), Some("user@upi")), (Some("Burger"), Some(""))] {
			assert!(service.create_order(food, upi).await.is_err());
		}
		assert_eq!(ids.0.load(Ordering::SeqCst), 0);

		// The first id a successful create would use is still free.
		let result: Result<Order, _> = storage.retrieve("orders", "CNT00000").await;
		assert!(matches!(result, Err(order_storage::StorageError::NotFound)));

		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();
		assert_eq!(order.order_id, "CNT00000");
	}

	#[tokio::test]
	async fn test_malformed_ids_are_not_found_on_file_storage() {
		let temp_dir = TempDir::new().unwrap();
		let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(
			temp_dir.path().to_path_buf(),
		))));
		let mut verifier = MockPaymentVerifier::new();
		verifier.expect_verify().never();
		let service = OrderService::new(storage, Arc::new(PaymentService::new(Box::new(verifier))), 5);

		let long_id = "A".repeat(300);
		for order_id in [long_id.as_str(), "AB\0CD34", "../../etc", "ab12cd34"] {
			let err = service.get_order_status(order_id).await.unwrap_err();
			assert!(matches!(err, OrderServiceError::OrderNotFound(ref m) if m == ORDER_NOT_FOUND));

			let err = service
				.process_payment(Some(order_id), Some("user@upi"))
				.await
				.unwrap_err();
			assert!(matches!(err, OrderServiceError::OrderNotFound(ref m) if m == NO_PENDING_ORDER));
		}
	}

	#[tokio::test]
	async fn test_create_order_regenerates_on_collision() {
		let service = service_with(Box::new(FixedVerifier::new(true)))
			.with_id_generator(Box::new(SequenceIds::new(vec!["TAKEN001", "TAKEN001", "FREE0001"])));

		let first = service.create_order(Some("Pizza"), Some("a@upi")).await.unwrap();
		assert_eq!(first.order_id, "TAKEN001");

		let second = service.create_order(Some("Burger"), Some("b@upi")).await.unwrap();
		assert_eq!(second.order_id, "FREE0001");

		// The first order was not overwritten.
		let original = service.get_order_status("TAKEN001").await.unwrap();
		assert_eq!(original.food_item, "Pizza");
		assert_eq!(original.upi_id, "a@upi");
	}

	#[tokio::test]
	async fn test_create_order_gives_up_after_max_attempts() {
		let service = OrderService::new(
			memory_storage(),
			Arc::new(PaymentService::new(Box::new(FixedVerifier::new(true)))),
			3,
		)
		.with_id_generator(Box::new(SequenceIds::new(vec!["SAME0001"])));

		service.create_order(Some("Pizza"), Some("a@upi")).await.unwrap();
		let err = service
			.create_order(Some("Burger"), Some("b@upi"))
			.await
			.unwrap_err();
		assert!(matches!(err, OrderServiceError::IdentifierExhausted(3)));
	}

	#[tokio::test]
	async fn test_approved_payment_completes_order() {
		let service = service_with(Box::new(FixedVerifier::new(true)));
		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();

		let paid = service
			.process_payment(Some(&order.order_id), Some("user@upi"))
			.await
			.unwrap();
		assert_eq!(paid.payment_status, PaymentStatus::Completed);
		assert_eq!(paid.food_item, "Burger");

		let stored = service.get_order_status(&order.order_id).await.unwrap();
		assert_eq!(stored.payment_status, PaymentStatus::Completed);
	}

	#[tokio::test]
	async fn test_completed_order_cannot_be_paid_again() {
		let mut verifier = MockPaymentVerifier::new();
		verifier
			.expect_verify()
			.times(1)
			.returning(|_, _| Ok(PaymentDecision::Approved));
		let service = service_with(Box::new(verifier));
		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();

		service
			.process_payment(Some(&order.order_id), Some("user@upi"))
			.await
			.unwrap();
		let err = service
			.process_payment(Some(&order.order_id), Some("user@upi"))
			.await
			.unwrap_err();
		assert!(matches!(err, OrderServiceError::OrderNotFound(ref m) if m == NO_PENDING_ORDER));
	}

	#[tokio::test]
	async fn test_declined_payment_keeps_order_pending_and_retryable() {
		let mut verifier = MockPaymentVerifier::new();
		let mut seq = mockall::Sequence::new();
		verifier
			.expect_verify()
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_, _| Ok(PaymentDecision::Declined));
		verifier
			.expect_verify()
			.times(1)
			.in_sequence(&mut seq)
			.returning(|_, _| Ok(PaymentDecision::Approved));
		let service = service_with(Box::new(verifier));
		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();

		let err = service
			.process_payment(Some(&order.order_id), Some("user@upi"))
			.await
			.unwrap_err();
		assert!(matches!(err, OrderServiceError::PaymentDeclined(ref id) if *id == order.order_id));
		let stored = service.get_order_status(&order.order_id).await.unwrap();
		assert_eq!(stored.payment_status, PaymentStatus::Pending);

		let paid = service
			.process_payment(Some(&order.order_id), Some("user@upi"))
			.await
			.unwrap();
		assert_eq!(paid.payment_status, PaymentStatus::Completed);
	}

	#[tokio::test]
	async fn test_verifier_receives_upi_and_order_id() {
		let storage = memory_storage();
		let order = Order::new("VERIFY01", "Dosa", "buyer@upi");
		OrderStateMachine::new(storage.clone())
			.create_order(&order)
			.await
			.unwrap();

		let mut verifier = MockPaymentVerifier::new();
		verifier
			.expect_verify()
			.with(eq("buyer@upi"), eq("VERIFY01"))
			.times(1)
			.returning(|_, _| Ok(PaymentDecision::Approved));
		let service = OrderService::new(storage, Arc::new(PaymentService::new(Box::new(verifier))), 5);

		service
			.process_payment(Some("VERIFY01"), Some("buyer@upi"))
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn test_payment_rejects_mismatched_upi_without_calling_gateway() {
		let mut verifier = MockPaymentVerifier::new();
		verifier.expect_verify().never();
		let service = service_with(Box::new(verifier));
		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();

		let err = service
			.process_payment(Some(&order.order_id), Some("someone@upi"))
			.await
			.unwrap_err();
		assert!(matches!(err, OrderServiceError::OrderNotFound(ref m) if m == NO_PENDING_ORDER));

		let err = service
			.process_payment(Some("NOPE0000"), Some("user@upi"))
			.await
			.unwrap_err();
		assert!(matches!(err, OrderServiceError::OrderNotFound(ref m) if m == NO_PENDING_ORDER));
	}

	#[tokio::test]
	async fn test_payment_requires_both_fields() {
		let service = service_with(Box::new(FixedVerifier::new(true)));

		let err = service.process_payment(None, Some("user@upi")).await.unwrap_err();
		assert!(matches!(err, OrderServiceError::InvalidRequest(ref m) if m == PAYMENT_FIELDS_REQUIRED));
		let err = service.process_payment(Some("AB12CD34"), Some("")).await.unwrap_err();
		assert!(matches!(err, OrderServiceError::InvalidRequest(_)));
	}

	#[tokio::test]
	async fn test_gateway_failure_is_unavailable() {
		let mut verifier = MockPaymentVerifier::new();
		verifier
			.expect_verify()
			.returning(|_, _| Err(PaymentError::Unavailable("timeout".into())));
		let service = service_with(Box::new(verifier));
		let order = service
			.create_order(Some("Burger"), Some("user@upi"))
			.await
			.unwrap();

		let err = service
			.process_payment(Some(&order.order_id), Some("user@upi"))
			.await
			.unwrap_err();
		assert!(matches!(err, OrderServiceError::PaymentUnavailable(_)));

		let stored = service.get_order_status(&order.order_id).await.unwrap();
		assert_eq!(stored.payment_status, PaymentStatus::Pending);
	}

	#[tokio::test]
	async fn test_unknown_order_status() {
		let service = service_with(Box::new(FixedVerifier::new(true)));
		let err = service.get_order_status("ZZZZZZZZ").await.unwrap_err();
		assert!(matches!(err, OrderServiceError::OrderNotFound(ref m) if m == ORDER_NOT_FOUND));
	}

	#[tokio::test]
	async fn test_orders_survive_restart_with_file_storage() {
		let temp_dir = TempDir::new().unwrap();
		let payment = Arc::new(PaymentService::new(Box::new(FixedVerifier::new(true))));

		let order_id = {
			let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(
				temp_dir.path().to_path_buf(),
			))));
			let service = OrderService::new(storage, payment.clone(), 5);
			let order = service
				.create_order(Some("Biryani"), Some("user@upi"))
				.await
				.unwrap();
			service
				.process_payment(Some(&order.order_id), Some("user@upi"))
				.await
				.unwrap();
			order.order_id
		};

		let storage = Arc::new(StorageService::new(Box::new(FileStorage::new(
			temp_dir.path().to_path_buf(),
		))));
		let service = OrderService::new(storage, payment, 5);
		let order = service.get_order_status(&order_id).await.unwrap();
		assert_eq!(order.food_item, "Biryani");
		assert_eq!(order.payment_status, PaymentStatus::Completed);
	}
}

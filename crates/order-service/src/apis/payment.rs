//! Payment endpoint.

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use order_types::{APIError, PaymentRequest, PaymentResponse, PAYMENT_SUCCESS_MESSAGE};

use super::rejection_to_api_error;
use crate::server::AppState;

/// Handles POST /payment requests.
///
/// A declined payment answers 400 with `"Payment failed"` and leaves the
/// order pending, so the same request may be sent again.
pub async fn process_payment(
	State(state): State<AppState>,
	payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, APIError> {
	let Json(request) = payload.map_err(rejection_to_api_error)?;

	let order = state
		.orders
		.process_payment(request.order_id.as_deref(), request.upi_id.as_deref())
		.await
		.map_err(|e| {
			tracing::warn!("Payment failed: {}", e);
			APIError::from(e)
		})?;

	Ok(Json(PaymentResponse {
		message: PAYMENT_SUCCESS_MESSAGE.to_string(),
		order_id: order.order_id,
		food_item: order.food_item,
	}))
}

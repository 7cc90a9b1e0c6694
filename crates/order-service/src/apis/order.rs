//! Order creation and status endpoints.

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;
use order_types::{
	APIError, CreateOrderRequest, CreateOrderResponse, OrderStatusResponse, ORDER_CREATED_MESSAGE,
};

use super::rejection_to_api_error;
use crate::server::AppState;

/// Handles POST /order requests.
pub async fn create_order(
	State(state): State<AppState>,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, APIError> {
	let Json(request) = payload.map_err(rejection_to_api_error)?;

	let order = state
		.orders
		.create_order(request.food_item.as_deref(), request.upi_id.as_deref())
		.await
		.map_err(|e| {
			tracing::warn!("Order creation failed: {}", e);
			APIError::from(e)
		})?;

	Ok(Json(CreateOrderResponse {
		message: ORDER_CREATED_MESSAGE.to_string(),
		order_id: order.order_id,
	}))
}

/// Handles GET /order/status/{order_id} requests.
pub async fn get_order_status(
	State(state): State<AppState>,
	Path(order_id): Path<String>,
) -> Result<Json<OrderStatusResponse>, APIError> {
	match state.orders.get_order_status(&order_id).await {
		Ok(order) => Ok(Json(order.into())),
		Err(e) => {
			tracing::debug!(order_id = %order_id, "Order status lookup failed: {}", e);
			Err(APIError::from(e))
		},
	}
}

//! Request handlers for the order API.

pub mod order;
pub mod payment;

use axum::extract::rejection::JsonRejection;
use order_types::APIError;

/// Maps a body that failed to parse as JSON onto the invalid-request error.
pub(crate) fn rejection_to_api_error(rejection: JsonRejection) -> APIError {
	tracing::debug!(error = %rejection.body_text(), "Rejected request body");
	APIError::BadRequest {
		error_type: "INVALID_REQUEST".to_string(),
		message: "Request body must be a JSON object".to_string(),
		details: Some(serde_json::json!({ "reason": rejection.body_text() })),
	}
}

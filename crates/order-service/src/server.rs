//! HTTP server for the food order API.

use axum::{
	extract::DefaultBodyLimit,
	http::{header, HeaderValue, Method, StatusCode},
	routing::{get, post},
	Router,
};
use order_config::ApiConfig;
use order_core::OrderService;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

use crate::apis;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Order lifecycle operations.
	pub orders: Arc<OrderService>,
}

/// Builds the CORS layer. Permissive unless specific origins are configured.
fn cors_layer(api_config: &ApiConfig) -> CorsLayer {
	let Some(cors) = &api_config.cors else {
		return CorsLayer::permissive();
	};
	if cors.allowed_origins.iter().any(|origin| origin == "*") {
		return CorsLayer::permissive();
	}

	let origins: Vec<HeaderValue> = cors
		.allowed_origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
				None
			},
		})
		.collect();

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([header::CONTENT_TYPE])
}

/// Builds the API router with its middleware stack.
pub fn build_router(state: AppState, api_config: &ApiConfig) -> Router {
	Router::new()
		.route("/order", post(apis::order::create_order))
		.route("/payment", post(apis::payment::process_payment))
		.route("/order/status/{order_id}", get(apis::order::get_order_status))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::with_status_code(
					StatusCode::REQUEST_TIMEOUT,
					Duration::from_secs(api_config.timeout_seconds),
				))
				.layer(cors_layer(api_config)),
		)
		.layer(DefaultBodyLimit::max(api_config.max_request_size))
		.with_state(state)
}

/// Starts the HTTP server and serves until the process is stopped.
pub async fn start_server(
	api_config: ApiConfig,
	orders: Arc<OrderService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { orders }, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Food order API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

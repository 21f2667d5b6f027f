//! HTTP server for the desk API.
//!
//! This module provides the HTTP server infrastructure for the order-desk
//! endpoints: routing, shared state, and CORS.

use crate::apis;
use crate::auth::SessionService;
use axum::{
	routing::{get, post},
	Router,
};
use desk_config::ApiConfig;
use desk_core::DeskEngine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the desk engine for processing requests.
	pub engine: Arc<DeskEngine>,
	/// Session service backing the auth endpoints.
	pub sessions: Arc<SessionService>,
}

/// Builds the API router.
///
/// Split out from `start_server` so tests can drive the router without
/// binding a socket.
pub fn build_router(engine: Arc<DeskEngine>, sessions: Arc<SessionService>) -> Router {
	let app_state = AppState { engine, sessions };

	Router::new()
		.nest(
			"/api",
			Router::new()
				.route(
					"/orders",
					get(apis::orders::list_orders).post(apis::orders::submit_order),
				)
				.route("/orders/summary", get(apis::orders::order_summary))
				.route("/orders/{id}", get(apis::orders::get_order))
				.route("/orders/{id}/approve", post(apis::orders::approve_order))
				.route("/orders/{id}/reject", post(apis::orders::reject_order))
				.route("/auth/login", post(apis::auth::login))
				.route("/auth/status", get(apis::auth::status))
				.route("/auth/logout", post(apis::auth::logout)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state)
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<DeskEngine>,
	sessions: Arc<SessionService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(engine, sessions);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Desk API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

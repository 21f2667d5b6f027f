//! Auth endpoints for the desk API.
//!
//! Exposes the three-operation auth contract consumed by the dashboard:
//! login (issues a bearer token), status (boolean logged-in flag), and
//! logout (revokes the token).

use crate::apis::orders::bearer_token;
use crate::server::AppState;
use axum::{extract::State, http::HeaderMap, response::Json};
use desk_types::{ApiError, AuthStatusResponse, LoginRequest, LoginResponse};
use tracing::info;

/// Handles POST /api/auth/login requests.
pub async fn login(
	State(state): State<AppState>,
	Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
	match state
		.sessions
		.login(&request.username, &request.password)
		.await
	{
		Some((token, expires_at)) => {
			info!("Session opened for {}", request.username);
			Ok(Json(LoginResponse { token, expires_at }))
		}
		None => Err(ApiError::Unauthorized {
			message: "Invalid credentials".to_string(),
		}),
	}
}

/// Handles GET /api/auth/status requests.
///
/// Never fails: a missing or unknown token reports `loggedIn: false`.
pub async fn status(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Json<AuthStatusResponse> {
	let logged_in = match bearer_token(&headers) {
		Some(token) => state.sessions.is_logged_in(token).await,
		None => false,
	};
	Json(AuthStatusResponse { logged_in })
}

/// Handles POST /api/auth/logout requests.
///
/// Idempotent: logging out an unknown or already-revoked token succeeds.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatusResponse> {
	if let Some(token) = bearer_token(&headers) {
		state.sessions.logout(token).await;
	}
	Json(AuthStatusResponse { logged_in: false })
}

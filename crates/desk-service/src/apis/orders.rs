//! Order endpoints for the desk API.
//!
//! Implements the projected list, the per-status summary, order detail
//! retrieval, the approve/reject transition actions, and the
//! acknowledgment-only submission endpoint.

use crate::server::AppState;
use axum::{
	extract::{Path, Query, State},
	http::{HeaderMap, StatusCode},
	response::Json,
};
use desk_core::{OrderAction, WorkflowError};
use desk_types::{
	ActionAcceptedResponse, ApiError, Order, OrderListResponse, OrderSummaryResponse,
	StatusFilter, SubmitOrderRequest, SubmitOrderResponse,
};
use serde::Deserialize;
use tracing::{info, warn};

/// Query parameters for the projected order list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
	/// Status filter: "all" or one status value. Defaults to "all".
	pub status: Option<String>,
	/// Free-text search query. Defaults to empty.
	pub q: Option<String>,
}

/// Extracts the bearer token from the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	headers
		.get(axum::http::header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.strip_prefix("Bearer "))
}

/// Rejects the request unless it carries a live session token.
async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
	let token = bearer_token(headers).ok_or_else(|| ApiError::Unauthorized {
		message: "Missing bearer token".to_string(),
	})?;

	if !state.sessions.is_logged_in(token).await {
		return Err(ApiError::Unauthorized {
			message: "Session is not logged in".to_string(),
		});
	}
	Ok(())
}

/// Handles GET /api/orders requests.
///
/// Projects the order store through the requested status filter and search
/// query. An empty store or an all-excluding predicate yields an explicit
/// empty list with `total == 0`, not an error.
pub async fn list_orders(
	State(state): State<AppState>,
	Query(params): Query<ListParams>,
) -> Result<Json<OrderListResponse>, ApiError> {
	let filter = match params.status.as_deref() {
		None => StatusFilter::All,
		Some(raw) => raw.parse().map_err(|_| ApiError::BadRequest {
			error_type: "INVALID_STATUS_FILTER".to_string(),
			message: format!("Unknown status filter: {}", raw),
		})?,
	};
	let query = params.q.unwrap_or_default();

	let orders = state
		.engine
		.project(filter, &query)
		.await
		.map_err(|e| ApiError::InternalServerError {
			message: e.to_string(),
		})?;

	let total = orders.len();
	Ok(Json(OrderListResponse { orders, total }))
}

/// Handles GET /api/orders/summary requests.
pub async fn order_summary(
	State(state): State<AppState>,
) -> Result<Json<OrderSummaryResponse>, ApiError> {
	let (all, counts) = state
		.engine
		.summary()
		.await
		.map_err(|e| ApiError::InternalServerError {
			message: e.to_string(),
		})?;

	Ok(Json(OrderSummaryResponse { all, counts }))
}

/// Handles GET /api/orders/{id} requests.
pub async fn get_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
	let order = state
		.engine
		.get_order(&id)
		.await
		.map_err(|e| ApiError::InternalServerError {
			message: e.to_string(),
		})?;

	match order {
		Some(order) => Ok(Json(order)),
		None => Err(ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("Order not found: {}", id),
		}),
	}
}

/// Handles POST /api/orders/{id}/approve requests.
pub async fn approve_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
	headers: HeaderMap,
) -> Result<(StatusCode, Json<ActionAcceptedResponse>), ApiError> {
	start_action(state, id, headers, OrderAction::Approve).await
}

/// Handles POST /api/orders/{id}/reject requests.
pub async fn reject_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
	headers: HeaderMap,
) -> Result<(StatusCode, Json<ActionAcceptedResponse>), ApiError> {
	start_action(state, id, headers, OrderAction::Reject).await
}

/// Accepts a transition action on behalf of a logged-in session.
///
/// Note the unknown-id contract: an action on a nonexistent order is
/// accepted here and later completes as a silent no-op, so this never
/// returns 404.
async fn start_action(
	state: AppState,
	id: String,
	headers: HeaderMap,
	action: OrderAction,
) -> Result<(StatusCode, Json<ActionAcceptedResponse>), ApiError> {
	require_session(&state, &headers).await?;

	match state.engine.submit_action(action, &id).await {
		Ok(()) => Ok((
			StatusCode::ACCEPTED,
			Json(ActionAcceptedResponse {
				order_id: id,
				target: action.target(),
			}),
		)),
		Err(e) => {
			warn!("Action {} on {} refused: {}", action, id, e);
			Err(match e {
				WorkflowError::AlreadyInFlight(_) => ApiError::Conflict {
					error_type: "ACTION_IN_FLIGHT".to_string(),
					message: e.to_string(),
				},
				WorkflowError::InvalidTransition { .. } => ApiError::Conflict {
					error_type: "INVALID_TRANSITION".to_string(),
					message: e.to_string(),
				},
				WorkflowError::State(message) => ApiError::InternalServerError { message },
			})
		}
	}
}

/// Handles POST /api/orders requests.
///
/// The submission endpoint mirrors the dashboard's new-order form: it
/// acknowledges every submission without validating fields and without
/// appending to the store. There is no creation path in this system.
pub async fn submit_order(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(request): Json<SubmitOrderRequest>,
) -> Result<Json<SubmitOrderResponse>, ApiError> {
	require_session(&state, &headers).await?;

	info!(
		"Order submission acknowledged for customer {:?}",
		request.customer
	);
	Ok(Json(SubmitOrderResponse {
		accepted: true,
		message: "Order submitted".to_string(),
	}))
}

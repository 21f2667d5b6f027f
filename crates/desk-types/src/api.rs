//! API types for the desk HTTP API.
//!
//! This module defines the request and response types for the order-desk
//! endpoints, along with a structured API error type mapped to HTTP statuses.

use crate::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Response for the projected order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
	/// Orders surviving the current filter and search, in store order.
	pub orders: Vec<Order>,
	/// Number of orders in the projection.
	pub total: usize,
}

/// Per-status order counts, used by the filter chips in the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummaryResponse {
	/// Total number of stored orders.
	pub all: usize,
	/// Count of orders per status. Statuses with zero orders are included.
	pub counts: BTreeMap<String, usize>,
}

/// Response returned when a transition action has been accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionAcceptedResponse {
	/// Identifier of the targeted order.
	#[serde(rename = "orderId")]
	pub order_id: String,
	/// Status value the action will write on completion.
	pub target: OrderStatus,
}

/// Request body for the order submission endpoint.
///
/// None of these fields are validated; submission is acknowledgment-only and
/// never appends to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
	pub customer: Option<String>,
	pub service: Option<String>,
	pub source: Option<String>,
	pub destination: Option<String>,
	pub bandwidth: Option<String>,
	pub priority: Option<String>,
	pub notes: Option<String>,
}

/// Static acknowledgment returned for every order submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
	pub accepted: bool,
	pub message: String,
}

/// Request body for session login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

/// Response containing a newly issued session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
	pub token: String,
	/// Unix timestamp (seconds) when the session expires.
	#[serde(rename = "expiresAt")]
	pub expires_at: u64,
}

/// Boolean logged-in flag for a presented session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
	#[serde(rename = "loggedIn")]
	pub logged_in: bool,
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
	/// Additional error context.
	pub details: Option<serde_json::Value>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Bad request with validation errors (400).
	BadRequest { error_type: String, message: String },
	/// Missing or invalid session (401).
	Unauthorized { message: String },
	/// Requested resource does not exist (404).
	NotFound { error_type: String, message: String },
	/// Request conflicts with current resource state (409).
	Conflict { error_type: String, message: String },
	/// Internal server error (500).
	InternalServerError { message: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest { .. } => 400,
			ApiError::Unauthorized { .. } => 401,
			ApiError::NotFound { .. } => 404,
			ApiError::Conflict { .. } => 409,
			ApiError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			ApiError::BadRequest { error_type, message } => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
			},
			ApiError::Unauthorized { message } => ErrorResponse {
				error: "UNAUTHORIZED".to_string(),
				message: message.clone(),
				details: None,
			},
			ApiError::NotFound { error_type, message } => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
			},
			ApiError::Conflict { error_type, message } => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
			},
			ApiError::InternalServerError { message } => ErrorResponse {
				error: "INTERNAL_ERROR".to_string(),
				message: message.clone(),
				details: None,
			},
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			ApiError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
			ApiError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
			ApiError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			}
		}
	}
}

impl std::error::Error for ApiError {}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let error_response = self.to_error_response();
		(status, Json(error_response)).into_response()
	}
}

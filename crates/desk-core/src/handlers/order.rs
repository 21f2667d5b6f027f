//! Order workflow handler for approve/reject actions.
//!
//! An action is accepted up front (precondition check plus an in-flight
//! marker for the targeted order), then completed after an artificial delay
//! that simulates the upstream provisioning call. Completion writes the new
//! status through the state machine and publishes a user-visible
//! acknowledgment event. An action targeting an unknown order id is a silent
//! no-op: it is accepted, completes without touching the store, and surfaces
//! only as a Skipped event and a warning.

use crate::engine::event_bus::EventBus;
use crate::state::{OrderStateMachine, StateError};
use dashmap::DashMap;
use desk_types::{DeskEvent, OrderEvent, OrderStatus};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur during the approve/reject workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
	#[error("Action already in flight for order {0}")]
	AlreadyInFlight(String),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("State error: {0}")]
	State(String),
}

/// The two transition actions offered by the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
	/// Approve a pending order.
	Approve,
	/// Reject a conflicted order.
	Reject,
}

impl OrderAction {
	/// Status value this action writes on completion.
	pub fn target(&self) -> OrderStatus {
		match self {
			OrderAction::Approve => OrderStatus::Approved,
			OrderAction::Reject => OrderStatus::Rejected,
		}
	}
}

impl fmt::Display for OrderAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderAction::Approve => write!(f, "approve"),
			OrderAction::Reject => write!(f, "reject"),
		}
	}
}

/// Handler for processing order transition actions.
///
/// The in-flight marker set replaces the dashboard's process-wide loading
/// flag: actions on distinct orders proceed independently, while a second
/// action on an order already in flight is refused up front.
pub struct OrderHandler {
	state_machine: Arc<OrderStateMachine>,
	event_bus: EventBus,
	transition_delay: Duration,
	in_flight: DashMap<String, OrderAction>,
}

impl OrderHandler {
	pub fn new(
		state_machine: Arc<OrderStateMachine>,
		event_bus: EventBus,
		transition_delay: Duration,
	) -> Self {
		Self {
			state_machine,
			event_bus,
			transition_delay,
			in_flight: DashMap::new(),
		}
	}

	/// Whether an action is currently in flight for the given order.
	pub fn is_in_flight(&self, order_id: &str) -> bool {
		self.in_flight.contains_key(order_id)
	}

	/// Releases the in-flight marker for an accepted action that will not
	/// be completed, e.g. when queueing it failed.
	pub fn cancel(&self, order_id: &str) {
		self.in_flight.remove(order_id);
	}

	/// Accepts an action: checks the transition precondition and places the
	/// in-flight marker.
	///
	/// An unknown order id is accepted here and skipped at completion,
	/// keeping the silent no-op contract. An order whose current status
	/// cannot transition to the action's target is refused.
	pub async fn begin(&self, action: OrderAction, order_id: &str) -> Result<(), WorkflowError> {
		if self.in_flight.contains_key(order_id) {
			return Err(WorkflowError::AlreadyInFlight(order_id.to_string()));
		}

		match self.state_machine.get_order(order_id).await {
			Ok(order) => {
				let target = action.target();
				if !OrderStateMachine::is_valid_transition(&order.status, &target) {
					return Err(WorkflowError::InvalidTransition {
						from: order.status,
						to: target,
					});
				}
			}
			// Unknown id: accepted, completes as a skip
			Err(StateError::OrderNotFound(_)) => {}
			Err(e) => return Err(WorkflowError::State(e.to_string())),
		}

		use dashmap::mapref::entry::Entry;
		match self.in_flight.entry(order_id.to_string()) {
			Entry::Occupied(_) => return Err(WorkflowError::AlreadyInFlight(order_id.to_string())),
			Entry::Vacant(entry) => {
				entry.insert(action);
			}
		}

		let started = match action {
			OrderAction::Approve => OrderEvent::ApprovalStarted {
				order_id: order_id.to_string(),
			},
			OrderAction::Reject => OrderEvent::RejectionStarted {
				order_id: order_id.to_string(),
			},
		};
		self.event_bus.publish(DeskEvent::Order(started)).ok();

		Ok(())
	}

	/// Completes an accepted action after the artificial delay.
	///
	/// The in-flight marker is removed on every completion path.
	#[instrument(skip(self), fields(action = %action, order_id = %order_id))]
	pub async fn handle(&self, action: OrderAction, order_id: String) -> Result<(), WorkflowError> {
		tokio::time::sleep(self.transition_delay).await;

		let result = self.complete(action, &order_id).await;
		self.in_flight.remove(&order_id);
		result
	}

	async fn complete(&self, action: OrderAction, order_id: &str) -> Result<(), WorkflowError> {
		let target = action.target();
		match self
			.state_machine
			.transition_order_status(order_id, target)
			.await
		{
			Ok(order) => {
				tracing::info!("Order {} transitioned to {}", order_id, target);
				let ack = match action {
					OrderAction::Approve => OrderEvent::Approved {
						order_id: order_id.to_string(),
					},
					OrderAction::Reject => OrderEvent::Rejected {
						order_id: order_id.to_string(),
					},
				};
				self.event_bus.publish(DeskEvent::Order(ack)).ok();
				self.event_bus
					.publish(DeskEvent::Store(desk_types::StoreEvent::Updated { order }))
					.ok();
				Ok(())
			}
			Err(StateError::OrderNotFound(_)) => {
				// Silent no-op: the store is unchanged and no error is
				// surfaced to the caller
				tracing::warn!("Order {} not found; {} action skipped", order_id, action);
				self.event_bus
					.publish(DeskEvent::Order(OrderEvent::Skipped {
						order_id: order_id.to_string(),
						reason: "order not found".to_string(),
					}))
					.ok();
				Ok(())
			}
			Err(StateError::InvalidTransition { from, to }) => {
				// The order changed between acceptance and completion
				tracing::warn!(
					"Order {} can no longer transition from {} to {}; action skipped",
					order_id,
					from,
					to
				);
				self.event_bus
					.publish(DeskEvent::Order(OrderEvent::Skipped {
						order_id: order_id.to_string(),
						reason: format!("invalid transition from {} to {}", from, to),
					}))
					.ok();
				Ok(())
			}
			Err(e) => Err(WorkflowError::State(e.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures;
	use desk_storage::implementations::memory::MemoryStorage;
	use desk_storage::StorageService;

	async fn handler() -> OrderHandler {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let machine = Arc::new(OrderStateMachine::new(storage));
		for order in fixtures::seed_orders() {
			machine.store_order(&order).await.unwrap();
		}
		OrderHandler::new(machine, EventBus::default(), Duration::from_millis(5))
	}

	#[tokio::test]
	async fn test_begin_refuses_invalid_transition() {
		let handler = handler().await;

		// ORD-002 is already approved
		let result = handler.begin(OrderAction::Approve, "ORD-002").await;
		assert!(matches!(
			result,
			Err(WorkflowError::InvalidTransition { .. })
		));
		assert!(!handler.is_in_flight("ORD-002"));
	}

	#[tokio::test]
	async fn test_begin_refuses_duplicate_action() {
		let handler = handler().await;

		handler.begin(OrderAction::Approve, "ORD-001").await.unwrap();
		assert!(handler.is_in_flight("ORD-001"));

		let result = handler.begin(OrderAction::Approve, "ORD-001").await;
		assert!(matches!(result, Err(WorkflowError::AlreadyInFlight(_))));
	}

	#[tokio::test]
	async fn test_actions_on_distinct_orders_are_independent() {
		let handler = handler().await;

		handler.begin(OrderAction::Approve, "ORD-001").await.unwrap();
		handler.begin(OrderAction::Reject, "ORD-003").await.unwrap();

		assert!(handler.is_in_flight("ORD-001"));
		assert!(handler.is_in_flight("ORD-003"));
	}

	#[tokio::test]
	async fn test_cancel_releases_marker() {
		let handler = handler().await;

		handler.begin(OrderAction::Approve, "ORD-001").await.unwrap();
		handler.cancel("ORD-001");
		assert!(!handler.is_in_flight("ORD-001"));

		// The order can be acted on again
		handler.begin(OrderAction::Approve, "ORD-001").await.unwrap();
	}

	#[tokio::test]
	async fn test_handle_clears_marker() {
		let handler = handler().await;

		handler.begin(OrderAction::Approve, "ORD-001").await.unwrap();
		handler
			.handle(OrderAction::Approve, "ORD-001".to_string())
			.await
			.unwrap();

		assert!(!handler.is_in_flight("ORD-001"));
	}

	#[tokio::test]
	async fn test_unknown_order_is_silent_noop() {
		let handler = handler().await;

		// Accepted up front
		handler.begin(OrderAction::Reject, "ORD-999").await.unwrap();
		// Completes without error
		handler
			.handle(OrderAction::Reject, "ORD-999".to_string())
			.await
			.unwrap();
	}
}

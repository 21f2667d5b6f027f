//! Order state machine implementation.
//!
//! Manages order state transitions with validation. Only two transitions are
//! reachable in this system: PendingApproval -> Approved and
//! Conflict -> Rejected. Every other status is static. The machine also
//! stamps `updated` on each mutation, which is the record's "last status
//! change" timestamp contract.

use chrono::Utc;
use desk_storage::{StorageError, StorageService};
use desk_types::{Order, OrderStatus, StorageKey};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum StateError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("Order not found: {0}")]
	OrderNotFound(String),
}

// Static transition table - each state maps to allowed next states
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::PendingApproval,
		HashSet::from([OrderStatus::Approved]),
	);
	m.insert(
		OrderStatus::Conflict,
		HashSet::from([OrderStatus::Rejected]),
	);
	// Terminal or static in this system
	m.insert(OrderStatus::Approved, HashSet::new());
	m.insert(OrderStatus::Processing, HashSet::new());
	m.insert(OrderStatus::Completed, HashSet::new());
	m.insert(OrderStatus::Rejected, HashSet::new());
	m
});

/// Manages order state transitions and persistence
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: &str) -> Result<Order, StateError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => StateError::OrderNotFound(order_id.to_string()),
				other => StateError::Storage(other.to_string()),
			})
	}

	/// Lists all orders in store (seed) order.
	pub async fn list_orders(&self) -> Result<Vec<Order>, StateError> {
		self.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(|e| StateError::Storage(e.to_string()))
	}

	/// Stores a new order
	pub async fn store_order(&self, order: &Order) -> Result<(), StateError> {
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| StateError::Storage(e.to_string()))
	}

	/// Updates an order with a closure and persists it.
	///
	/// `updated` is stamped with the current time on every call; the closure
	/// does not need to touch it.
	pub async fn update_order_with<F>(
		&self,
		order_id: &str,
		updater: F,
	) -> Result<Order, StateError>
	where
		F: FnOnce(&mut Order),
	{
		let mut order = self.get_order(order_id).await?;

		// Apply the update
		updater(&mut order);

		// Automatically set the updated timestamp
		order.updated = Utc::now();

		self.storage
			.update(StorageKey::Orders.as_str(), order_id, &order)
			.await
			.map_err(|e| StateError::Storage(e.to_string()))?;

		Ok(order)
	}

	/// Transitions an order to a new status with validation
	pub async fn transition_order_status(
		&self,
		order_id: &str,
		new_status: OrderStatus,
	) -> Result<Order, StateError> {
		let order = self.get_order(order_id).await?;

		// Validate state transition
		if !Self::is_valid_transition(&order.status, &new_status) {
			return Err(StateError::InvalidTransition {
				from: order.status,
				to: new_status,
			});
		}

		self.update_order_with(order_id, |o| {
			o.status = new_status;
		})
		.await
	}

	/// Checks if a state transition is valid
	pub fn is_valid_transition(from: &OrderStatus, to: &OrderStatus) -> bool {
		TRANSITIONS.get(from).is_some_and(|set| set.contains(to))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures;
	use desk_storage::implementations::memory::MemoryStorage;

	async fn seeded_machine() -> OrderStateMachine {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let machine = OrderStateMachine::new(storage);
		for order in fixtures::seed_orders() {
			machine.store_order(&order).await.unwrap();
		}
		machine
	}

	#[test]
	fn test_transition_table() {
		use OrderStatus::*;

		assert!(OrderStateMachine::is_valid_transition(
			&PendingApproval,
			&Approved
		));
		assert!(OrderStateMachine::is_valid_transition(&Conflict, &Rejected));

		// No transition back, no cross transitions
		assert!(!OrderStateMachine::is_valid_transition(
			&Approved,
			&PendingApproval
		));
		assert!(!OrderStateMachine::is_valid_transition(
			&PendingApproval,
			&Rejected
		));
		assert!(!OrderStateMachine::is_valid_transition(&Conflict, &Approved));
		assert!(!OrderStateMachine::is_valid_transition(
			&Processing,
			&Completed
		));
		assert!(!OrderStateMachine::is_valid_transition(&Completed, &Rejected));
	}

	#[tokio::test]
	async fn test_transition_stamps_updated() {
		let machine = seeded_machine().await;
		let before = machine.get_order("ORD-001").await.unwrap();

		let after = machine
			.transition_order_status("ORD-001", OrderStatus::Approved)
			.await
			.unwrap();

		assert_eq!(after.status, OrderStatus::Approved);
		assert!(after.updated > before.updated);
		// Only status and updated change
		assert_eq!(after.customer, before.customer);
		assert_eq!(after.created, before.created);
		assert_eq!(after.conflicts, before.conflicts);
	}

	#[tokio::test]
	async fn test_invalid_transition_leaves_store_untouched() {
		let machine = seeded_machine().await;
		let before = machine.get_order("ORD-002").await.unwrap();

		let result = machine
			.transition_order_status("ORD-002", OrderStatus::Rejected)
			.await;
		assert!(matches!(
			result,
			Err(StateError::InvalidTransition {
				from: OrderStatus::Approved,
				to: OrderStatus::Rejected,
			})
		));

		let after = machine.get_order("ORD-002").await.unwrap();
		assert_eq!(after, before);
	}

	#[tokio::test]
	async fn test_missing_order_is_not_found() {
		let machine = seeded_machine().await;
		let result = machine
			.transition_order_status("ORD-999", OrderStatus::Approved)
			.await;
		assert!(matches!(result, Err(StateError::OrderNotFound(_))));
	}
}

//! Event types for inter-service communication.
//!
//! This module defines the event system used by the desk for asynchronous
//! communication between components. Events flow through an event bus allowing
//! services to react to state changes in other parts of the system.

use crate::Order;
use serde::{Deserialize, Serialize};

/// Main event type encompassing all desk events.
///
/// Events are categorized by the service that produces them, allowing
/// consumers to filter and handle specific event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeskEvent {
	/// Events from the order store.
	Store(StoreEvent),
	/// Events from the order workflow.
	Order(OrderEvent),
}

/// Events related to the order store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
	/// The store has been seeded with its initial records.
	Seeded { count: usize },
	/// A stored record has changed. Projections derived from the store
	/// should be recomputed.
	Updated { order: Order },
}

/// Events related to the approve/reject workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// An approve action has been accepted and is in flight.
	ApprovalStarted { order_id: String },
	/// A reject action has been accepted and is in flight.
	RejectionStarted { order_id: String },
	/// An order has been approved. This is the user-visible acknowledgment.
	Approved { order_id: String },
	/// An order has been rejected. This is the user-visible acknowledgment.
	Rejected { order_id: String },
	/// An action completed without touching the store (e.g. unknown id).
	Skipped { order_id: String, reason: String },
}

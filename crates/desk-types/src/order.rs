//! Order types for the service-order desk.
//!
//! This module defines the service-order entity and its closed status and
//! priority enumerations, used throughout the order lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A service-order record tracked through an approval/provisioning lifecycle.
///
/// Orders are seeded once at startup and mutated only by the approve/reject
/// workflow, which rewrites `status` and stamps `updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier, stable for the record's lifetime.
	pub id: String,
	/// Customer the circuit is provisioned for.
	pub customer: String,
	/// Service product description (e.g. "Metro-E 10 Gbps").
	pub service: String,
	/// Source endpoint of the requested circuit.
	pub source: String,
	/// Destination endpoint of the requested circuit.
	pub destination: String,
	/// Current lifecycle status. This is the entity's primary state.
	pub status: OrderStatus,
	/// Requested bandwidth as descriptive text, not a parsed quantity.
	pub bandwidth: String,
	/// Business priority, independent of status.
	pub priority: Priority,
	/// Timestamp when this order was created.
	pub created: DateTime<Utc>,
	/// Timestamp of the last status change.
	pub updated: DateTime<Utc>,
	/// Conflict-reason tags (e.g. "capacity_exceeded"). Informational only;
	/// the transition workflow never mutates these.
	#[serde(default)]
	pub conflicts: Vec<String>,
	/// Inventory-management (UIM) status as reported by the external system.
	/// Displayed as-is, never reconciled against `status`.
	pub uim_status: String,
	/// Network-management (NMS) status as reported by the external system.
	/// Displayed as-is, never reconciled against `status`.
	pub nms_status: String,
	/// Link utilization percent in [0, 100]. Display-only.
	pub utilization: u8,
	/// Estimated provisioning completion time.
	#[serde(rename = "estimatedCompletion")]
	pub estimated_completion: DateTime<Utc>,
}

/// Status of an order in the desk system.
///
/// A closed enumeration. Only two transitions are reachable through the
/// workflow: `PendingApproval -> Approved` and `Conflict -> Rejected`. The
/// remaining values are set at creation and never transitioned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Order is awaiting operator approval.
	PendingApproval,
	/// Order has been approved for provisioning.
	Approved,
	/// A provisioning conflict has been detected.
	Conflict,
	/// Order is being provisioned.
	Processing,
	/// Provisioning is complete.
	Completed,
	/// Order has been rejected.
	Rejected,
}

impl OrderStatus {
	/// Returns the wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::PendingApproval => "pending_approval",
			OrderStatus::Approved => "approved",
			OrderStatus::Conflict => "conflict",
			OrderStatus::Processing => "processing",
			OrderStatus::Completed => "completed",
			OrderStatus::Rejected => "rejected",
		}
	}

	/// Returns an iterator over all status variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::PendingApproval,
			Self::Approved,
			Self::Conflict,
			Self::Processing,
			Self::Completed,
			Self::Rejected,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending_approval" => Ok(Self::PendingApproval),
			"approved" => Ok(Self::Approved),
			"conflict" => Ok(Self::Conflict),
			"processing" => Ok(Self::Processing),
			"completed" => Ok(Self::Completed),
			"rejected" => Ok(Self::Rejected),
			_ => Err(()),
		}
	}
}

/// Business priority of an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
	Low,
	Medium,
	High,
	Critical,
}

impl fmt::Display for Priority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Priority::Low => write!(f, "low"),
			Priority::Medium => write!(f, "medium"),
			Priority::High => write!(f, "high"),
			Priority::Critical => write!(f, "critical"),
		}
	}
}

/// Status selector for the order projection.
///
/// `All` passes every record; `Status(s)` passes records whose status equals
/// `s` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
	/// No status restriction.
	All,
	/// Restrict to a single status value.
	Status(OrderStatus),
}

impl StatusFilter {
	/// Whether an order passes this filter.
	pub fn matches(&self, order: &Order) -> bool {
		match self {
			StatusFilter::All => true,
			StatusFilter::Status(status) => order.status == *status,
		}
	}
}

impl Default for StatusFilter {
	fn default() -> Self {
		Self::All
	}
}

impl fmt::Display for StatusFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StatusFilter::All => write!(f, "all"),
			StatusFilter::Status(status) => write!(f, "{}", status),
		}
	}
}

impl FromStr for StatusFilter {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"all" => Ok(Self::All),
			other => OrderStatus::from_str(other).map(Self::Status),
		}
	}
}

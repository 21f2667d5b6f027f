//! Filter/search projection over the order store.
//!
//! Given the full order list, a status filter, and a free-text query, the
//! projector derives the displayed subset: both predicates are ANDed and the
//! relative order of surviving records matches the store. The projector is a
//! pure function; recomputation happens on every upstream change and any
//! coalescing of rapid triggers is left to the caller.

use desk_types::{Order, OrderStatus, StatusFilter};
use std::collections::BTreeMap;

/// Text fields searched by the free-text query.
///
/// The query passes when its lowercased form is a substring of the lowercased
/// value of any of these fields.
fn matches_query(order: &Order, query_lower: &str) -> bool {
	[
		&order.customer,
		&order.id,
		&order.service,
		&order.source,
		&order.destination,
	]
	.iter()
	.any(|field| field.to_lowercase().contains(query_lower))
}

/// Projects the order list through the status filter and search query.
///
/// A whitespace-only query is treated as empty. The result is always an
/// order-preserving subsequence of `orders`; for `StatusFilter::All` and an
/// empty query it equals the input.
pub fn project(orders: &[Order], filter: StatusFilter, query: &str) -> Vec<Order> {
	let query = query.trim();
	let query_lower = query.to_lowercase();

	orders
		.iter()
		.filter(|order| filter.matches(order))
		.filter(|order| query.is_empty() || matches_query(order, &query_lower))
		.cloned()
		.collect()
}

/// Counts orders per status, including statuses with no orders.
///
/// Backs the filter chips in the dashboard, which show a count per status
/// next to the total.
pub fn status_counts(orders: &[Order]) -> BTreeMap<String, usize> {
	let mut counts: BTreeMap<String, usize> = OrderStatus::all()
		.map(|status| (status.as_str().to_string(), 0))
		.collect();
	for order in orders {
		if let Some(count) = counts.get_mut(order.status.as_str()) {
			*count += 1;
		}
	}
	counts
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::seed_orders;

	fn ids(orders: &[Order]) -> Vec<&str> {
		orders.iter().map(|o| o.id.as_str()).collect()
	}

	#[test]
	fn test_no_filter_no_query_is_identity() {
		let orders = seed_orders();
		let projected = project(&orders, StatusFilter::All, "");
		assert_eq!(projected, orders);
	}

	#[test]
	fn test_whitespace_query_is_identity() {
		let orders = seed_orders();
		let projected = project(&orders, StatusFilter::All, "   ");
		assert_eq!(projected, orders);
	}

	#[test]
	fn test_status_filter_only() {
		let orders = seed_orders();
		let projected = project(
			&orders,
			StatusFilter::Status(OrderStatus::Conflict),
			"",
		);
		assert_eq!(ids(&projected), vec!["ORD-003"]);
	}

	#[test]
	fn test_query_searches_all_five_fields() {
		let orders = seed_orders();

		// customer
		assert_eq!(ids(&project(&orders, StatusFilter::All, "mandiri")), vec!["ORD-002"]);
		// id
		assert_eq!(ids(&project(&orders, StatusFilter::All, "ORD-004")), vec!["ORD-004"]);
		// service
		assert_eq!(ids(&project(&orders, StatusFilter::All, "mpls")), vec!["ORD-004"]);
		// source
		assert_eq!(ids(&project(&orders, StatusFilter::All, "tbs 4")), vec!["ORD-005"]);
		// destination
		assert_eq!(ids(&project(&orders, StatusFilter::All, "depok")), vec!["ORD-003"]);
	}

	#[test]
	fn test_query_is_case_insensitive() {
		let orders = seed_orders();
		assert_eq!(
			project(&orders, StatusFilter::All, "JAKARTA"),
			project(&orders, StatusFilter::All, "jakarta")
		);
	}

	#[test]
	fn test_predicates_are_anded() {
		let orders = seed_orders();
		// ORD-005 matches "shopee" but is Completed, not PendingApproval
		let projected = project(
			&orders,
			StatusFilter::Status(OrderStatus::PendingApproval),
			"shopee",
		);
		assert!(projected.is_empty());
	}

	#[test]
	fn test_projection_preserves_store_order() {
		let orders = seed_orders();
		// "tbs 1" matches ORD-001 and ORD-003; order must match the store
		let projected = project(&orders, StatusFilter::All, "tbs 1");
		assert_eq!(ids(&projected), vec!["ORD-001", "ORD-003"]);
	}

	#[test]
	fn test_projection_is_idempotent() {
		let orders = seed_orders();
		let once = project(&orders, StatusFilter::All, "gbps");
		let twice = project(&once, StatusFilter::All, "gbps");
		assert_eq!(once, twice);
	}

	#[test]
	fn test_empty_store_yields_empty_projection() {
		let projected = project(&[], StatusFilter::All, "anything");
		assert!(projected.is_empty());
	}

	#[test]
	fn test_status_counts_cover_all_statuses() {
		let orders = seed_orders();
		let counts = status_counts(&orders);

		assert_eq!(counts.len(), 6);
		assert_eq!(counts["pending_approval"], 1);
		assert_eq!(counts["approved"], 1);
		assert_eq!(counts["conflict"], 1);
		assert_eq!(counts["processing"], 1);
		assert_eq!(counts["completed"], 1);
		assert_eq!(counts["rejected"], 0);
	}
}

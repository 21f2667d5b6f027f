//! End-to-end scenarios for the desk engine against the fixture records.

use desk_config::{AuthConfig, Config, DeskConfig, StorageConfig, WorkflowConfig};
use desk_core::{DeskEngine, OrderAction, WorkflowError};
use desk_storage::implementations::memory::MemoryStorage;
use desk_storage::StorageService;
use desk_types::{DeskEvent, OrderEvent, OrderStatus, StatusFilter};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

fn test_config(transition_delay_ms: u64) -> Config {
	let mut implementations = HashMap::new();
	implementations.insert("memory".to_string(), toml::Value::Table(toml::Table::new()));

	Config {
		desk: DeskConfig {
			id: "test-desk".to_string(),
		},
		storage: StorageConfig {
			primary: "memory".to_string(),
			implementations,
		},
		workflow: WorkflowConfig {
			transition_delay_ms,
		},
		auth: AuthConfig {
			username: "operator".to_string(),
			password: "secret".to_string(),
			session_ttl_seconds: 3600,
		},
		api: None,
	}
}

async fn running_engine(transition_delay_ms: u64) -> Arc<DeskEngine> {
	let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
	let engine = Arc::new(DeskEngine::new(test_config(transition_delay_ms), storage));
	engine.seed().await.unwrap();

	let runner = engine.clone();
	tokio::spawn(async move {
		runner.run().await.unwrap();
	});

	engine
}

/// Waits for the next order event matching the predicate.
async fn wait_for_order_event<F>(
	rx: &mut broadcast::Receiver<DeskEvent>,
	mut predicate: F,
) -> OrderEvent
where
	F: FnMut(&OrderEvent) -> bool,
{
	timeout(Duration::from_secs(2), async {
		loop {
			if let DeskEvent::Order(event) = rx.recv().await.unwrap() {
				if predicate(&event) {
					return event;
				}
			}
		}
	})
	.await
	.expect("timed out waiting for order event")
}

#[tokio::test]
async fn test_seed_yields_fixture_order() {
	let engine = running_engine(5).await;

	let orders = engine.project(StatusFilter::All, "").await.unwrap();
	let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
	assert_eq!(
		ids,
		vec!["ORD-001", "ORD-002", "ORD-003", "ORD-004", "ORD-005"]
	);
}

#[tokio::test]
async fn test_conflict_filter_yields_ord_003() {
	let engine = running_engine(5).await;

	let orders = engine
		.project(StatusFilter::Status(OrderStatus::Conflict), "")
		.await
		.unwrap();
	let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
	assert_eq!(ids, vec!["ORD-003"]);
}

#[tokio::test]
async fn test_search_mandiri_yields_ord_002() {
	let engine = running_engine(5).await;

	let orders = engine.project(StatusFilter::All, "mandiri").await.unwrap();
	let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
	assert_eq!(ids, vec!["ORD-002"]);
}

#[tokio::test]
async fn test_status_filter_excludes_search_match() {
	let engine = running_engine(5).await;

	let orders = engine
		.project(StatusFilter::Status(OrderStatus::PendingApproval), "shopee")
		.await
		.unwrap();
	assert!(orders.is_empty());
}

#[tokio::test]
async fn test_approve_completes_and_touches_only_target() {
	let engine = running_engine(5).await;
	let before = engine.list_orders().await.unwrap();
	let mut events = engine.event_bus().subscribe();

	engine
		.submit_action(OrderAction::Approve, "ORD-001")
		.await
		.unwrap();

	let event = wait_for_order_event(&mut events, |e| {
		matches!(e, OrderEvent::Approved { .. })
	})
	.await;
	match event {
		OrderEvent::Approved { order_id } => assert_eq!(order_id, "ORD-001"),
		other => panic!("unexpected event: {:?}", other),
	}

	let after = engine.list_orders().await.unwrap();
	assert_eq!(after[0].status, OrderStatus::Approved);
	assert!(after[0].updated > before[0].updated);

	// All other records unchanged
	for (b, a) in before.iter().zip(after.iter()).skip(1) {
		assert_eq!(b, a);
	}
}

#[tokio::test]
async fn test_reject_unknown_id_is_silent_noop() {
	let engine = running_engine(5).await;
	let before = engine.list_orders().await.unwrap();
	let mut events = engine.event_bus().subscribe();

	// No error raised
	engine
		.submit_action(OrderAction::Reject, "ORD-999")
		.await
		.unwrap();

	let event = wait_for_order_event(&mut events, |e| {
		matches!(e, OrderEvent::Skipped { .. })
	})
	.await;
	match event {
		OrderEvent::Skipped { order_id, .. } => assert_eq!(order_id, "ORD-999"),
		other => panic!("unexpected event: {:?}", other),
	}

	// Store unchanged
	let after = engine.list_orders().await.unwrap();
	assert_eq!(before, after);
}

#[tokio::test]
async fn test_invalid_transition_refused_at_submission() {
	let engine = running_engine(5).await;

	// ORD-005 is completed; neither action applies
	let result = engine.submit_action(OrderAction::Approve, "ORD-005").await;
	assert!(matches!(
		result,
		Err(WorkflowError::InvalidTransition {
			from: OrderStatus::Completed,
			to: OrderStatus::Approved,
		})
	));

	let result = engine.submit_action(OrderAction::Reject, "ORD-001").await;
	assert!(matches!(
		result,
		Err(WorkflowError::InvalidTransition { .. })
	));
}

#[tokio::test]
async fn test_closed_queue_does_not_block_order() {
	let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
	let engine = Arc::new(DeskEngine::new(test_config(5), storage));
	engine.seed().await.unwrap();

	// Let the run loop take the action receiver, then kill it so the
	// queue closes
	let runner = engine.clone();
	let handle = tokio::spawn(async move { runner.run().await });
	tokio::task::yield_now().await;
	handle.abort();
	let _ = handle.await;

	let result = engine.submit_action(OrderAction::Approve, "ORD-001").await;
	assert!(matches!(result, Err(WorkflowError::State(_))));

	// The failed submission must not leave an in-flight marker behind:
	// a retry hits the same queue error, never AlreadyInFlight
	let retry = engine.submit_action(OrderAction::Approve, "ORD-001").await;
	assert!(matches!(retry, Err(WorkflowError::State(_))));
}

#[tokio::test]
async fn test_duplicate_action_refused_while_in_flight() {
	// Long delay so the first action is still in flight
	let engine = running_engine(500).await;

	engine
		.submit_action(OrderAction::Approve, "ORD-001")
		.await
		.unwrap();
	let result = engine.submit_action(OrderAction::Approve, "ORD-001").await;
	assert!(matches!(result, Err(WorkflowError::AlreadyInFlight(_))));
}

#[tokio::test]
async fn test_concurrent_actions_on_distinct_orders() {
	let engine = running_engine(20).await;
	let mut events = engine.event_bus().subscribe();

	engine
		.submit_action(OrderAction::Approve, "ORD-001")
		.await
		.unwrap();
	engine
		.submit_action(OrderAction::Reject, "ORD-003")
		.await
		.unwrap();

	let mut approved = false;
	let mut rejected = false;
	while !(approved && rejected) {
		match wait_for_order_event(&mut events, |e| {
			matches!(e, OrderEvent::Approved { .. } | OrderEvent::Rejected { .. })
		})
		.await
		{
			OrderEvent::Approved { order_id } => {
				assert_eq!(order_id, "ORD-001");
				approved = true;
			}
			OrderEvent::Rejected { order_id } => {
				assert_eq!(order_id, "ORD-003");
				rejected = true;
			}
			_ => {}
		}
	}

	let orders = engine.list_orders().await.unwrap();
	assert_eq!(orders[0].status, OrderStatus::Approved);
	assert_eq!(orders[2].status, OrderStatus::Rejected);
}

#[tokio::test]
async fn test_summary_counts() {
	let engine = running_engine(5).await;

	let (total, counts) = engine.summary().await.unwrap();
	assert_eq!(total, 5);
	assert_eq!(counts["pending_approval"], 1);
	assert_eq!(counts["rejected"], 0);

	let mut events = engine.event_bus().subscribe();
	engine
		.submit_action(OrderAction::Reject, "ORD-003")
		.await
		.unwrap();
	wait_for_order_event(&mut events, |e| matches!(e, OrderEvent::Rejected { .. })).await;

	let (_, counts) = engine.summary().await.unwrap();
	assert_eq!(counts["conflict"], 0);
	assert_eq!(counts["rejected"], 1);
}

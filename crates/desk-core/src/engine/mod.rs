//! Core desk engine that orchestrates the order lifecycle.
//!
//! This module contains the main DeskEngine struct which owns the order
//! store, the state machine and the workflow handler, and runs the main loop
//! that completes accepted transition actions.

pub mod event_bus;

use crate::fixtures;
use crate::handlers::{OrderAction, OrderHandler, WorkflowError};
use crate::projection;
use crate::state::OrderStateMachine;
use desk_config::Config;
use desk_storage::StorageService;
use desk_types::{DeskEvent, Order, StatusFilter, StoreEvent};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, Semaphore};

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Service error: {0}")]
	Service(String),
	#[error("State error: {0}")]
	State(String),
}

/// An accepted transition action awaiting completion.
#[derive(Debug)]
struct ActionRequest {
	action: OrderAction,
	order_id: String,
}

/// Maximum number of concurrently completing actions.
static ACTION_CONCURRENCY: usize = 100;

/// Main desk engine.
///
/// The engine seeds the store from fixture data, answers projection queries,
/// accepts transition actions, and completes them on its run loop.
pub struct DeskEngine {
	/// Desk configuration.
	config: Config,
	/// Storage service backing the order store.
	storage: Arc<StorageService>,
	/// Order state machine.
	state_machine: Arc<OrderStateMachine>,
	/// Workflow handler for approve/reject actions.
	order_handler: Arc<OrderHandler>,
	/// Event bus for inter-service communication.
	event_bus: event_bus::EventBus,
	/// Sender side of the action queue.
	action_tx: mpsc::UnboundedSender<ActionRequest>,
	/// Receiver side of the action queue, taken by `run`.
	action_rx: Mutex<Option<mpsc::UnboundedReceiver<ActionRequest>>>,
}

impl DeskEngine {
	/// Creates a new desk engine over the given storage backend.
	pub fn new(config: Config, storage: Arc<StorageService>) -> Self {
		let event_bus = event_bus::EventBus::default();
		let state_machine = Arc::new(OrderStateMachine::new(storage.clone()));
		let order_handler = Arc::new(OrderHandler::new(
			state_machine.clone(),
			event_bus.clone(),
			Duration::from_millis(config.workflow.transition_delay_ms),
		));
		let (action_tx, action_rx) = mpsc::unbounded_channel();

		Self {
			config,
			storage,
			state_machine,
			order_handler,
			event_bus,
			action_tx,
			action_rx: Mutex::new(Some(action_rx)),
		}
	}

	/// Seeds the order store from the fixture records.
	///
	/// Records already present are left untouched, so re-running startup
	/// does not clobber transitions that have happened since.
	pub async fn seed(&self) -> Result<(), EngineError> {
		let orders = fixtures::seed_orders();
		let mut seeded = 0;

		for order in &orders {
			let exists = self
				.storage
				.exists(desk_types::StorageKey::Orders.as_str(), &order.id)
				.await
				.map_err(|e| EngineError::Service(e.to_string()))?;
			if !exists {
				self.state_machine
					.store_order(order)
					.await
					.map_err(|e| EngineError::State(e.to_string()))?;
				seeded += 1;
			}
		}

		tracing::info!("Seeded order store with {} records", seeded);
		self.event_bus
			.publish(DeskEvent::Store(StoreEvent::Seeded { count: seeded }))
			.ok();
		Ok(())
	}

	/// Returns all orders in store order.
	pub async fn list_orders(&self) -> Result<Vec<Order>, EngineError> {
		self.state_machine
			.list_orders()
			.await
			.map_err(|e| EngineError::State(e.to_string()))
	}

	/// Returns one order by id, if present.
	pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>, EngineError> {
		match self.state_machine.get_order(order_id).await {
			Ok(order) => Ok(Some(order)),
			Err(crate::state::StateError::OrderNotFound(_)) => Ok(None),
			Err(e) => Err(EngineError::State(e.to_string())),
		}
	}

	/// Projects the order store through the given filter and query.
	pub async fn project(
		&self,
		filter: StatusFilter,
		query: &str,
	) -> Result<Vec<Order>, EngineError> {
		let orders = self.list_orders().await?;
		Ok(projection::project(&orders, filter, query))
	}

	/// Returns the total order count and per-status counts.
	pub async fn summary(&self) -> Result<(usize, BTreeMap<String, usize>), EngineError> {
		let orders = self.list_orders().await?;
		Ok((orders.len(), projection::status_counts(&orders)))
	}

	/// Accepts a transition action and queues it for completion.
	///
	/// Precondition failures (invalid transition, action already in flight)
	/// are reported synchronously; an unknown order id is accepted and
	/// completes as a silent no-op.
	pub async fn submit_action(
		&self,
		action: OrderAction,
		order_id: &str,
	) -> Result<(), WorkflowError> {
		self.order_handler.begin(action, order_id).await?;

		let request = ActionRequest {
			action,
			order_id: order_id.to_string(),
		};
		if self.action_tx.send(request).is_err() {
			// The action will never complete; release the marker so the
			// order is not permanently blocked
			self.order_handler.cancel(order_id);
			return Err(WorkflowError::State("action queue closed".to_string()));
		}

		Ok(())
	}

	/// Main execution loop for the desk engine.
	///
	/// Completes queued actions until interrupted. May only be called once.
	pub async fn run(&self) -> Result<(), EngineError> {
		let mut action_rx = self
			.action_rx
			.lock()
			.await
			.take()
			.ok_or_else(|| EngineError::Service("engine is already running".to_string()))?;

		let semaphore = Arc::new(Semaphore::new(ACTION_CONCURRENCY));

		loop {
			tokio::select! {
				maybe_request = action_rx.recv() => {
					match maybe_request {
						Some(request) => {
							self.spawn_action(&semaphore, request).await;
						}
						None => break,
					}
				}

				// Shutdown signal
				_ = tokio::signal::ctrl_c() => {
					break;
				}
			}
		}

		Ok(())
	}

	/// Returns a reference to the event bus.
	pub fn event_bus(&self) -> &event_bus::EventBus {
		&self.event_bus
	}

	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Spawns the completion of an accepted action with semaphore-based
	/// concurrency control.
	async fn spawn_action(&self, semaphore: &Arc<Semaphore>, request: ActionRequest) {
		let handler = self.order_handler.clone();
		match semaphore.clone().acquire_owned().await {
			Ok(permit) => {
				tokio::spawn(async move {
					let _permit = permit; // Keep permit alive for duration of task
					if let Err(e) = handler.handle(request.action, request.order_id).await {
						tracing::error!("Action handler error: {}", e);
					}
				});
			}
			Err(e) => {
				tracing::error!("Failed to acquire semaphore permit: {}", e);
			}
		}
	}
}

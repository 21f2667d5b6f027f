//! Main entry point for the desk service.
//!
//! This binary provides the complete service-order desk: it seeds the order
//! store from fixture data, serves the dashboard API, and completes
//! approve/reject actions on the engine loop.

use clap::Parser;
use desk_config::Config;
use desk_core::DeskEngine;
use desk_storage::StorageService;
use desk_types::{DeskEvent, OrderEvent};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod auth;
mod server;

use auth::SessionService;

/// Command-line arguments for the desk service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the desk service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the desk engine over the configured storage backend
/// 5. Runs the engine (and API server, if enabled) until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.init();

	tracing::info!("Started desk service");

	// Load configuration
	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.desk.id);

	// Build the engine over the configured storage backend
	let storage = Arc::new(build_storage(&config)?);
	let engine = Arc::new(DeskEngine::new(config.clone(), storage));
	engine.seed().await?;

	let sessions = Arc::new(SessionService::new(&config.auth));

	// Surface workflow acknowledgments in the log (the dashboard's toast)
	spawn_acknowledgment_log(&engine);

	// Check if the API server should be started
	if let Some(api_config) = config.api.clone().filter(|api| api.enabled) {
		// Run both the engine and the API server concurrently
		let engine_task = engine.run();
		let api_task = server::start_server(api_config, engine.clone(), sessions);

		tokio::select! {
			result = engine_task => {
				tracing::info!("Engine finished");
				result?;
			}
			result = api_task => {
				tracing::info!("API server finished");
				result?;
			}
		}
	} else {
		tracing::info!("Starting engine only");
		engine.run().await?;
	}

	tracing::info!("Stopped desk service");
	Ok(())
}

/// Resolves the configured primary storage backend through the registered
/// factories.
fn build_storage(config: &Config) -> Result<StorageService, Box<dyn std::error::Error>> {
	let primary = &config.storage.primary;
	let backend_config = config
		.storage
		.implementations
		.get(primary)
		.ok_or_else(|| format!("Storage implementation '{}' not configured", primary))?;

	let factory = desk_storage::get_all_implementations()
		.into_iter()
		.find(|(name, _)| name == primary)
		.map(|(_, factory)| factory)
		.ok_or_else(|| format!("Unknown storage implementation '{}'", primary))?;

	let backend = factory(backend_config)?;
	Ok(StorageService::new(backend))
}

/// Logs user-visible acknowledgments published by the workflow.
fn spawn_acknowledgment_log(engine: &Arc<DeskEngine>) {
	let mut events = engine.event_bus().subscribe();
	tokio::spawn(async move {
		while let Ok(event) = events.recv().await {
			match event {
				DeskEvent::Order(OrderEvent::Approved { order_id }) => {
					tracing::info!("Order {} approved", order_id);
				}
				DeskEvent::Order(OrderEvent::Rejected { order_id }) => {
					tracing::info!("Order {} rejected", order_id);
				}
				DeskEvent::Order(OrderEvent::Skipped { order_id, reason }) => {
					tracing::warn!("Action on {} skipped: {}", order_id, reason);
				}
				_ => {}
			}
		}
	});
}

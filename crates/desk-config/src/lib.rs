//! Configuration module for the service-order desk.
//!
//! This module provides structures and utilities for managing desk
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required configuration values are
//! properly set. `${VAR}` and `${VAR:-default}` references are resolved from
//! the environment before parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the service-order desk.
///
/// This structure contains all configuration sections required for the desk
/// to operate: desk identity, storage backend, workflow timing, session auth,
/// and the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this desk instance.
	pub desk: DeskConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the approve/reject workflow.
	#[serde(default)]
	pub workflow: WorkflowConfig,
	/// Configuration for session authentication.
	pub auth: AuthConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to this desk instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeskConfig {
	/// Unique identifier for this desk instance.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the approve/reject workflow.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
	/// Artificial delay applied before a transition action writes to the
	/// store, simulating upstream provisioning latency.
	/// Defaults to 1000 ms if not specified.
	#[serde(default = "default_transition_delay_ms")]
	pub transition_delay_ms: u64,
}

impl Default for WorkflowConfig {
	fn default() -> Self {
		Self {
			transition_delay_ms: default_transition_delay_ms(),
		}
	}
}

/// Returns the default transition delay in milliseconds.
///
/// This matches the fixed one-second delay the dashboard uses to simulate
/// the upstream provisioning call.
fn default_transition_delay_ms() -> u64 {
	1000
}

/// Configuration for session authentication.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
	/// Username accepted by the login endpoint.
	pub username: String,
	/// Password accepted by the login endpoint.
	pub password: String,
	/// Session lifetime in seconds. Defaults to 8 hours if not specified.
	#[serde(default = "default_session_ttl_seconds")]
	pub session_ttl_seconds: u64,
}

/// Returns the default session lifetime in seconds.
///
/// This provides a default of 8 hours (one shift) when no explicit
/// lifetime is configured.
fn default_session_ttl_seconds() -> u64 {
	8 * 60 * 60
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
}

/// Returns the default API host.
///
/// This provides a default host address of 127.0.0.1 (localhost) for the
/// API server when no explicit host is configured.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
///
/// This provides a default port of 3000 for the API server when no explicit
/// port is configured.
fn default_api_port() -> u16 {
	3000
}

/// Returns the default API timeout in seconds.
///
/// This provides a default timeout of 30 seconds for API requests when no
/// explicit timeout is configured.
fn default_api_timeout() -> u64 {
	30
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file with environment variable resolution.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// This method performs validation across all configuration sections:
	/// - Ensures the desk ID is not empty
	/// - Validates the storage backend is specified and configured
	/// - Checks workflow timing bounds
	/// - Verifies auth credentials are set
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate desk config
		if self.desk.id.is_empty() {
			return Err(ConfigError::Validation("Desk ID cannot be empty".into()));
		}

		// Validate storage config
		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		// Validate workflow config
		if self.workflow.transition_delay_ms > 60_000 {
			return Err(ConfigError::Validation(
				"Workflow transition_delay_ms cannot exceed 60000 (1 minute)".into(),
			));
		}

		// Validate auth config
		if self.auth.username.is_empty() {
			return Err(ConfigError::Validation(
				"Auth username cannot be empty".into(),
			));
		}
		if self.auth.password.is_empty() {
			return Err(ConfigError::Validation(
				"Auth password cannot be empty".into(),
			));
		}
		if self.auth.session_ttl_seconds == 0 {
			return Err(ConfigError::Validation(
				"Auth session_ttl_seconds must be greater than 0".into(),
			));
		}
		if self.auth.session_ttl_seconds > 7 * 24 * 60 * 60 {
			return Err(ConfigError::Validation(
				"Auth session_ttl_seconds cannot exceed 604800 (7 days)".into(),
			));
		}

		// Validate API config if enabled
		if let Some(ref api) = self.api {
			if api.enabled && api.timeout_seconds == 0 {
				return Err(ConfigError::Validation(
					"API timeout_seconds must be greater than 0".into(),
				));
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// This allows configuration to be parsed from TOML strings using the
/// standard string parsing interface. Environment variables are resolved and
/// the configuration is automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE_CONFIG: &str = r#"
[desk]
id = "noc-desk"

[storage]
primary = "memory"
[storage.implementations.memory]

[workflow]
transition_delay_ms = 1000

[auth]
username = "operator"
password = "secret"
session_ttl_seconds = 3600

[api]
enabled = true
host = "127.0.0.1"
port = 3000
"#;

	#[test]
	fn test_env_var_resolution() {
		// Set up test environment variables
		std::env::set_var("TEST_HOST", "localhost");
		std::env::set_var("TEST_PORT", "5432");

		let input = "host = \"${TEST_HOST}:${TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		// Clean up
		std::env::remove_var("TEST_HOST");
		std::env::remove_var("TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MISSING_VAR"));
	}

	#[test]
	fn test_full_config_parses() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.desk.id, "noc-desk");
		assert_eq!(config.storage.primary, "memory");
		assert_eq!(config.workflow.transition_delay_ms, 1000);
		assert_eq!(config.auth.session_ttl_seconds, 3600);
		assert!(config.api.as_ref().unwrap().enabled);
	}

	#[test]
	fn test_config_with_env_vars() {
		std::env::set_var("TEST_DESK_ID", "jakarta-noc");

		let config_str = BASE_CONFIG.replace("\"noc-desk\"", "\"${TEST_DESK_ID}\"");
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.desk.id, "jakarta-noc");

		std::env::remove_var("TEST_DESK_ID");
	}

	#[test]
	fn test_workflow_defaults_when_section_missing() {
		let config_str = BASE_CONFIG.replace(
			"[workflow]\ntransition_delay_ms = 1000\n",
			"",
		);
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.workflow.transition_delay_ms, 1000);
	}

	#[test]
	fn test_unknown_primary_storage_rejected() {
		let config_str = BASE_CONFIG.replace("primary = \"memory\"", "primary = \"redis\"");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Primary storage 'redis' not found"));
	}

	#[test]
	fn test_excessive_transition_delay_rejected() {
		let config_str =
			BASE_CONFIG.replace("transition_delay_ms = 1000", "transition_delay_ms = 120000");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
	}

	#[test]
	fn test_empty_credentials_rejected() {
		let config_str = BASE_CONFIG.replace("password = \"secret\"", "password = \"\"");
		let result: Result<Config, _> = config_str.parse();
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Auth password cannot be empty"));
	}

	#[tokio::test]
	async fn test_from_file() {
		use std::io::Write;

		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(BASE_CONFIG.as_bytes()).unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.desk.id, "noc-desk");
	}
}

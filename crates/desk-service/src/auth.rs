//! Session authentication for the desk API.
//!
//! The desk consumes a minimal auth contract: a boolean logged-in flag per
//! presented token, a login that issues tokens against static configured
//! credentials, and a logout that revokes them. Sessions expire after a
//! configured lifetime; expired entries are pruned lazily on lookup.

use desk_config::AuthConfig;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Manages login sessions for the desk API.
pub struct SessionService {
	username: String,
	password: String,
	session_ttl: Duration,
	/// Active tokens mapped to their expiry as unix seconds.
	sessions: RwLock<HashMap<String, u64>>,
}

impl SessionService {
	/// Creates a new session service from the auth configuration.
	pub fn new(config: &AuthConfig) -> Self {
		Self {
			username: config.username.clone(),
			password: config.password.clone(),
			session_ttl: Duration::from_secs(config.session_ttl_seconds),
			sessions: RwLock::new(HashMap::new()),
		}
	}

	fn now_secs() -> u64 {
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap_or_default()
			.as_secs()
	}

	/// Attempts a login with the given credentials.
	///
	/// Returns the issued token and its expiry (unix seconds) on success,
	/// None on a credential mismatch.
	pub async fn login(&self, username: &str, password: &str) -> Option<(String, u64)> {
		if username != self.username || password != self.password {
			return None;
		}

		let token = Uuid::new_v4().to_string();
		let expires_at = Self::now_secs() + self.session_ttl.as_secs();

		let mut sessions = self.sessions.write().await;
		sessions.insert(token.clone(), expires_at);
		Some((token, expires_at))
	}

	/// Checks whether the given token belongs to a live session.
	///
	/// Expired tokens are removed as a side effect.
	pub async fn is_logged_in(&self, token: &str) -> bool {
		let now = Self::now_secs();

		{
			let sessions = self.sessions.read().await;
			match sessions.get(token) {
				Some(expires_at) if *expires_at > now => return true,
				None => return false,
				Some(_) => {} // expired, fall through to prune
			}
		}

		let mut sessions = self.sessions.write().await;
		sessions.remove(token);
		false
	}

	/// Revokes the given token. Unknown tokens are ignored.
	pub async fn logout(&self, token: &str) {
		let mut sessions = self.sessions.write().await;
		sessions.remove(token);
	}
}

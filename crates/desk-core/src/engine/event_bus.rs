//! Event bus for inter-service communication.
//!
//! A thin wrapper over a tokio broadcast channel. Publishing never blocks;
//! events are dropped for subscribers that lag behind, which is acceptable
//! for the acknowledgment/notification traffic carried here.

use desk_types::DeskEvent;
use tokio::sync::broadcast;

/// Default capacity of the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast-based event bus shared by the desk services.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<DeskEvent>,
}

impl EventBus {
	/// Creates a new event bus with the given channel capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers the event was delivered to, or an
	/// error if there are none. Callers that don't care use `.ok()`.
	pub fn publish(
		&self,
		event: DeskEvent,
	) -> Result<usize, broadcast::error::SendError<DeskEvent>> {
		self.sender.send(event)
	}

	/// Creates a new subscription to the event stream.
	pub fn subscribe(&self) -> broadcast::Receiver<DeskEvent> {
		self.sender.subscribe()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}

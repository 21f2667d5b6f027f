//! Storage-related types for the desk system.

/// Storage namespaces for the data collections held by the desk.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants. Orders are the only
/// collection routed through the storage service; sessions are held
/// in-memory by the session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Namespace for order records.
	Orders,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
		}
	}
}

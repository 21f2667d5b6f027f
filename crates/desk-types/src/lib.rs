//! Common types module for the service-order desk.
//!
//! This module defines the core data types and structures used throughout
//! the desk system. It provides a centralized location for shared types
//! to ensure consistency across all desk components.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Event types for inter-service communication.
pub mod events;
/// Order types including the order entity, status and priority enumerations.
pub mod order;
/// Storage types for managing stored data collections.
pub mod storage;

// Re-export all types for convenient access
pub use api::*;
pub use events::*;
pub use order::*;
pub use storage::*;

//! Core engine for the service-order desk.
//!
//! This crate provides the main orchestration logic for the desk: the order
//! store seeded from fixture data, the state machine governing status
//! transitions, the filter/search projection, and the approve/reject workflow
//! with its event-driven acknowledgments.

pub mod engine;
pub mod fixtures;
pub mod handlers;
pub mod projection;
pub mod state;

pub use engine::{DeskEngine, EngineError};
pub use handlers::{OrderAction, OrderHandler, WorkflowError};
pub use projection::{project, status_counts};
pub use state::{OrderStateMachine, StateError};

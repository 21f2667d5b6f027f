//! State management for the desk system.

mod order;

pub use order::{OrderStateMachine, StateError};

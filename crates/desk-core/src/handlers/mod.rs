//! Handlers for the desk workflow.

mod order;

pub use order::{OrderAction, OrderHandler, WorkflowError};

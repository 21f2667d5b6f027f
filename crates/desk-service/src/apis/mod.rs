//! API endpoint implementations for the desk HTTP server.

pub mod auth;
pub mod orders;

//! pyrun API server library.
//!
//! Exposes the building blocks (config, state, router, handlers, WebSocket
//! session) so integration tests and the binary entrypoint can both access
//! them.

pub mod config;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;

//! Domain logic for the script runner: directory discovery, static
//! argument extraction, and the subprocess-to-channel line streamer.
//!
//! Nothing in here knows about HTTP. The gateway crate adapts these
//! operations to axum handlers and WebSocket sessions.

pub mod discovery;
pub mod error;
pub mod streamer;

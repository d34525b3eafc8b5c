//! WebSocket run sessions.
//!
//! Each connection to `/ws/run` owns exactly one child process and nothing
//! is shared between connections.

mod session;

pub use session::{invalid_request_line, run_handler};

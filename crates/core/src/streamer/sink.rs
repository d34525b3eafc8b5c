//! Destinations for streamed output lines.

use std::future::Future;

use tokio::sync::mpsc;

/// The receiving side of a [`LineSink`] has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("line sink closed")]
pub struct SinkClosed;

/// Anything that accepts text lines in order, one at a time.
///
/// The gateway implements this for a WebSocket; channels and `Vec` are
/// implemented here for in-process consumers and tests.
pub trait LineSink: Send {
    /// Deliver one line. An error means no further lines can be delivered.
    fn send_line(&mut self, line: String) -> impl Future<Output = Result<(), SinkClosed>> + Send;
}

impl LineSink for mpsc::Sender<String> {
    async fn send_line(&mut self, line: String) -> Result<(), SinkClosed> {
        self.send(line).await.map_err(|_| SinkClosed)
    }
}

impl LineSink for mpsc::UnboundedSender<String> {
    async fn send_line(&mut self, line: String) -> Result<(), SinkClosed> {
        self.send(line).map_err(|_| SinkClosed)
    }
}

impl LineSink for Vec<String> {
    async fn send_line(&mut self, line: String) -> Result<(), SinkClosed> {
        self.push(line);
        Ok(())
    }
}

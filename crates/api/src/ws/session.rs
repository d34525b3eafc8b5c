use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use pyrun_core::streamer::{self, LaunchRequest, LineSink, RunOutcome, SinkClosed};
use uuid::Uuid;

/// HTTP handler that upgrades `/ws/run` to a WebSocket run session.
pub async fn run_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

/// Line sent when the first message is not a valid launch request.
pub fn invalid_request_line(err: &serde_json::Error) -> String {
    format!("❌ 无效的启动请求: {err}")
}

/// Drive one run session after upgrade:
///   1. Wait for the launch request (the only inbound message ever read).
///   2. Stream the process output back over the socket.
///   3. Close the socket.
///
/// If the peer disconnects mid-run the child process is left running.
async fn handle_socket(mut socket: WebSocket) {
    let session_id = Uuid::new_v4();
    tracing::info!(%session_id, "Run session connected");

    let request = match receive_launch_request(&mut socket).await {
        Ok(Some(request)) => request,
        Ok(None) => {
            tracing::info!(%session_id, "Run session closed before launch");
            return;
        }
        Err(e) => {
            tracing::warn!(%session_id, error = %e, "Invalid launch request");
            let _ = socket
                .send(Message::Text(invalid_request_line(&e).into()))
                .await;
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    tracing::info!(
        %session_id,
        interpreter = %request.interpreter_path,
        script = %request.script_path,
        args = request.args.len(),
        "Launching script",
    );

    let outcome = streamer::stream(&request, &mut SocketSink(&mut socket)).await;

    match outcome {
        RunOutcome::Exited { code } => {
            tracing::info!(%session_id, exit_code = code, "Run session finished");
        }
        RunOutcome::SpawnFailed => {
            tracing::info!(%session_id, "Run session finished without starting a process");
        }
        RunOutcome::Disconnected => {
            tracing::info!(%session_id, "Peer disconnected during run");
            return;
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

/// Wait for the first data frame and parse it as a [`LaunchRequest`].
///
/// Returns `Ok(None)` if the peer closes (or errors) before sending one.
async fn receive_launch_request(
    socket: &mut WebSocket,
) -> Result<Option<LaunchRequest>, serde_json::Error> {
    while let Some(result) = socket.recv().await {
        match result {
            Ok(Message::Text(text)) => return serde_json::from_str(text.as_str()).map(Some),
            Ok(Message::Binary(bytes)) => return serde_json::from_slice(&bytes).map(Some),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => return Ok(None),
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket receive error");
                return Ok(None);
            }
        }
    }
    Ok(None)
}

/// Adapts a WebSocket to the streamer's [`LineSink`]: one text frame per line.
struct SocketSink<'a>(&'a mut WebSocket);

impl LineSink for SocketSink<'_> {
    async fn send_line(&mut self, line: String) -> Result<(), SinkClosed> {
        self.0
            .send(Message::Text(line.into()))
            .await
            .map_err(|_| SinkClosed)
    }
}

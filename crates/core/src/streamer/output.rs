//! Spawning a child whose stdout and stderr arrive as one line stream.
//!
//! On Unix both descriptors of the child point at the write end of a single
//! pipe, so the parent observes writes in exactly the order the child made
//! them. Elsewhere the two pipes are read concurrently and interleaved per
//! line.

use std::io;
use std::process::Stdio;

use futures::stream::{BoxStream, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

/// Spawn `cmd` with stdin detached and both output streams merged.
///
/// `cmd` is consumed so that the parent's copies of the pipe's write end are
/// closed as soon as the child has them; otherwise end-of-stream would never
/// be observed.
#[cfg(unix)]
pub(crate) fn spawn_merged(mut cmd: Command) -> io::Result<(Child, BoxStream<'static, String>)> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe;

    let (reader, writer) = io::pipe()?;
    let writer_for_stderr = writer.try_clone()?;
    cmd.stdin(Stdio::null())
        .stdout(writer)
        .stderr(writer_for_stderr);

    let child = cmd.spawn()?;
    drop(cmd);

    let receiver = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    Ok((child, lossy_lines(receiver)))
}

#[cfg(not(unix))]
pub(crate) fn spawn_merged(mut cmd: Command) -> io::Result<(Child, BoxStream<'static, String>)> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

    let merged = futures::stream::select(lossy_lines(stdout), lossy_lines(stderr));
    Ok((child, merged.boxed()))
}

/// Turn a byte stream into lines, decoding each as lossy UTF-8.
///
/// A read error ends the stream; it is logged rather than surfaced because
/// the caller still wants the child's exit status.
fn lossy_lines<R>(reader: R) -> BoxStream<'static, String>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    futures::stream::unfold(BufReader::new(reader), |mut reader| async move {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((decode_line(&buf), reader)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed reading child output");
                None
            }
        }
    })
    .boxed()
}

/// Strip the line terminator (`\n` or `\r\n`) and decode.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

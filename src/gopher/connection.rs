use std::io;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::GopherError;
use crate::gopher::resolver::resolve;
use crate::gopher::selector::Request;
use crate::gopher::writer::write_error;

/// Longest request line accepted, terminator included.
pub const MAX_REQUEST_LINE: usize = 64 * 1024;

pub struct Connection<S = TcpStream> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<Config>,
}

pub enum ConnectionState {
    Reading,
    Resolving(Request),
    Failed(GopherError),
    Closed,
}

enum ReadOutcome {
    Line(BytesMut),
    TooLong,
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(1024),
            state: ConnectionState::Reading,
            config,
        }
    }

    /// Handles the one request this connection carries, then shuts the
    /// stream down whatever the outcome.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let outcome = match self.config.read_timeout() {
                        Some(limit) => match timeout(limit, self.read_line()).await {
                            Ok(outcome) => outcome?,
                            Err(_) => {
                                tracing::warn!(?limit, "Timed out waiting for request line");
                                ReadOutcome::Closed
                            }
                        },
                        None => self.read_line().await?,
                    };

                    self.state = match outcome {
                        ReadOutcome::Line(line) => match Request::from_bytes(&line) {
                            Ok(request) => ConnectionState::Resolving(request),
                            Err(e) => ConnectionState::Failed(e),
                        },
                        ReadOutcome::TooLong => ConnectionState::Failed(GopherError::BadSelector),
                        // Peer went away without asking for anything.
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Resolving(request) => {
                    tracing::info!(selector = %request.selector, "Request");

                    let mut out = BufWriter::new(&mut self.stream);
                    let result = resolve(&mut out, &request.selector, &self.config).await;
                    out.flush().await?;

                    match result {
                        Ok(served) => tracing::debug!(?served, "Response sent"),
                        Err(e) => self.state = ConnectionState::Failed(e),
                    }
                }

                ConnectionState::Failed(err) => {
                    tracing::warn!(error = %err, "Request failed");
                    write_error(&mut self.stream, &err.to_string()).await?;
                    self.stream.flush().await?;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads up to and including the first `\n`. Bytes left unterminated
    /// when the peer half-closes count as the line.
    async fn read_line(&mut self) -> io::Result<ReadOutcome> {
        let mut scanned = 0;

        loop {
            if let Some(pos) = self.buffer[scanned..].iter().position(|&b| b == b'\n') {
                return Ok(ReadOutcome::Line(self.buffer.split_to(scanned + pos + 1)));
            }
            scanned = self.buffer.len();

            if scanned > MAX_REQUEST_LINE {
                return Ok(ReadOutcome::TooLong);
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }
                return Ok(ReadOutcome::Line(self.buffer.split()));
            }
        }
    }
}

use crate::commands::CommandTable;
use crate::error::{AppError, ProtocolError};
use crate::metrics::Metrics;
use crate::protocol::{to_command, RespParser, RespValue};
use crate::storage::MemoryStore;
use bytes::BytesMut;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

/// Serves one client connection.
///
/// Requests are handled strictly one at a time: decode a frame, run it, write
/// and flush its reply, then look at the next frame. Pipelined requests are
/// therefore answered in the order they arrived.
pub struct Handler {
    store: Arc<MemoryStore>,
    commands: Arc<CommandTable>,
}

impl Handler {
    pub fn new(store: Arc<MemoryStore>, commands: Arc<CommandTable>) -> Self {
        Self { store, commands }
    }

    /// Process commands from a byte stream until it closes.
    ///
    /// A clean close between frames is `Ok`. A framing error ends the
    /// connection without a reply and is returned as `AppError::Protocol`.
    pub async fn handle_stream<S>(&self, stream: &mut S) -> Result<(), AppError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match self.serve(stream).await {
            Err(AppError::Protocol(err)) => {
                warn!(error = %err, "closing connection on framing error");
                Metrics::get().record_protocol_error();
                Err(AppError::Protocol(err))
            }
            other => other,
        }
    }

    async fn serve<S>(&self, stream: &mut S) -> Result<(), AppError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut parser = RespParser::new();
        let mut buffer = [0; 4096];
        let mut out = BytesMut::with_capacity(1024);

        loop {
            let n = stream.read(&mut buffer).await?;
            if n == 0 {
                parser.finish()?;
                return Ok(());
            }

            parser.add_data(&buffer[..n]);
            trace!(read = n, buffered = parser.buffered(), "received bytes");

            while let Some(value) = parser.parse()? {
                debug!(frame = ?value, "received command");
                let reply = self.handle_command(value)?;

                out.clear();
                reply.encode(&mut out);
                stream.write_all(&out).await?;
                stream.flush().await?;
            }
        }
    }

    /// Turn one decoded frame into its reply. Only a malformed command frame
    /// is an error here; command failures come back as `Error` replies.
    pub fn handle_command(&self, value: RespValue) -> Result<RespValue, ProtocolError> {
        let args = to_command(value)?;
        Ok(self.commands.execute(&self.store, &args))
    }
}

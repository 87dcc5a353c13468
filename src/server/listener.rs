use super::Handler;
use crate::commands::CommandTable;
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::metrics::Metrics;
use crate::storage::MemoryStore;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error, info, warn};

/// Accept loop. Every accepted socket gets its own task and its own
/// [`Handler`]; all of them share one store and one command table.
pub struct Server {
    listener: TcpListener,
    store: Arc<MemoryStore>,
    commands: Arc<CommandTable>,
    limit: Arc<Semaphore>,
}

impl Server {
    pub async fn bind(
        config: &ServerConfig,
        store: Arc<MemoryStore>,
        commands: Arc<CommandTable>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!(
            addr = %listener.local_addr()?,
            max_connections = config.max_connections,
            "kelp-kv listening"
        );

        Ok(Self {
            listener,
            store,
            commands,
            limit: Arc::new(Semaphore::new(config.max_connections)),
        })
    }

    /// The bound address; useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// A connection slot is taken before accepting, so once `max_connections`
    /// clients are open further clients wait in the listen backlog. Connections
    /// already open are not interrupted by shutdown.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let permit = tokio::select! {
                permit = Arc::clone(&self.limit).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                _ = &mut shutdown => break,
            };

            let (socket, peer) = tokio::select! {
                result = self.listener.accept() => match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!(error = %e, "accept error");
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        continue;
                    }
                },
                _ = &mut shutdown => break,
            };

            let handler = Handler::new(Arc::clone(&self.store), Arc::clone(&self.commands));
            tokio::spawn(handle_connection(handler, socket, peer, permit));
        }

        info!("no longer accepting connections");
        Ok(())
    }
}

async fn handle_connection(
    handler: Handler,
    mut socket: TcpStream,
    peer: SocketAddr,
    _permit: OwnedSemaphorePermit,
) {
    let metrics = Metrics::get();
    metrics.increment_connections();
    info!(%peer, "client connected");

    if let Err(e) = socket.set_nodelay(true) {
        debug!(%peer, error = %e, "failed to disable Nagle");
    }

    match handler.handle_stream(&mut socket).await {
        Ok(()) => info!(%peer, "client disconnected"),
        Err(AppError::Protocol(_)) => info!(%peer, "client dropped after framing error"),
        Err(e) => warn!(%peer, error = %e, "connection error"),
    }

    metrics.decrement_connections();
}

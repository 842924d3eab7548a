//! Registry hosted in-process over gRPC, for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;

use crate::LocalNameRegistry;
use crate::server::make_naming_service;

/// A [`LocalNameRegistry`] served on an ephemeral loopback port.
pub struct HostedRegistry {
    pub addr: SocketAddr,
    /// The map behind the service, for asserting on registry state directly.
    pub backing: Arc<LocalNameRegistry>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<Result<(), tonic::transport::Error>>,
}

impl HostedRegistry {
    /// Bind `127.0.0.1:0` and start serving.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let backing = Arc::new(LocalNameRegistry::new());
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let cancel = CancellationToken::new();

        let svc = make_naming_service(backing.clone());
        let shutdown = cancel.clone();
        let task = tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(svc)
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                    shutdown.cancelled().await;
                })
                .await
        });

        Ok(Self {
            addr,
            backing,
            cancel,
            task,
        })
    }

    #[must_use]
    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop serving and wait for the server task.
    ///
    /// # Errors
    /// Returns an error if the server task failed or panicked.
    pub async fn stop(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.cancel.cancel();
        self.task.await??;
        Ok(())
    }
}

/// A loopback port with nothing listening on it.
///
/// # Errors
/// Returns an error if no ephemeral port can be reserved.
pub fn closed_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

//! Exporting an object: bind a listener for it and serve gRPC calls.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use naming_sdk::ServiceEndpoint;
use remote_math_sdk::RemoteMath;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

use crate::api::grpc::RemoteMathServiceImpl;
use crate::error::StartupError;

/// An object bound to a listener, ready to accept calls once served.
pub struct ExportedObject {
    object: Arc<dyn RemoteMath>,
    listener: TcpListener,
    local_addr: SocketAddr,
    endpoint: ServiceEndpoint,
}

impl ExportedObject {
    /// Bind a listener for `object` on `listen_addr`.
    ///
    /// # Errors
    /// Returns [`StartupError::Export`] if the listener cannot be bound.
    pub async fn export(
        object: Arc<dyn RemoteMath>,
        listen_addr: SocketAddr,
        advertise_host: Option<&str>,
    ) -> Result<Self, StartupError> {
        let export_err = |source| StartupError::Export {
            addr: listen_addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(listen_addr).await.map_err(export_err)?;
        let local_addr = listener.local_addr().map_err(export_err)?;
        let endpoint = advertised_endpoint(local_addr, advertise_host);

        tracing::info!(%local_addr, uri = %endpoint.uri, "remote object exported");
        Ok(Self {
            object,
            listener,
            local_addr,
            endpoint,
        })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Endpoint published in the registry.
    #[must_use]
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Serve calls until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the gRPC server fails while running.
    pub async fn serve(self, cancel: CancellationToken) -> anyhow::Result<()> {
        let svc = RemoteMathServiceImpl::new(self.object).into_server();
        let incoming = TcpListenerStream::new(self.listener);

        Server::builder()
            .add_service(svc)
            .serve_with_incoming_shutdown(incoming, async move {
                cancel.cancelled().await;
                tracing::info!("remote object shutting down");
            })
            .await?;
        Ok(())
    }
}

/// Endpoint URI callers should use to reach `local_addr`.
///
/// An unspecified bind address (`0.0.0.0`, `::`) is not dialable, so it is
/// advertised as loopback unless an explicit host is configured.
fn advertised_endpoint(local_addr: SocketAddr, advertise_host: Option<&str>) -> ServiceEndpoint {
    if let Some(host) = advertise_host {
        return ServiceEndpoint::http(host, local_addr.port());
    }

    let dialable = if local_addr.ip().is_unspecified() {
        let loopback = match local_addr.ip() {
            IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
        };
        SocketAddr::new(loopback, local_addr.port())
    } else {
        local_addr
    };
    ServiceEndpoint::new(format!("http://{dialable}"))
}

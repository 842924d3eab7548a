//! Server bootstrap
//!
//! Startup order: locate the registry, export the object, publish the binding,
//! announce readiness. The process then stays alive until cancelled.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use naming_sdk::{Binding, GrpcNameRegistry, NameRegistry};
use remote_math_sdk::{RemoteMath, SERVICE_NAME};
use tokio_util::sync::CancellationToken;
use tonic::transport::Endpoint;

use crate::config::{BindPolicy, ServerConfig};
use crate::error::StartupError;
use crate::export::ExportedObject;

/// Line written to stdout once the object is published.
pub const READY_MESSAGE: &str = "Math server ready";

/// Connect to the registry named by `cfg.registry_uri`.
///
/// # Errors
/// Returns [`StartupError::InvalidConfig`] for a malformed URI and
/// [`StartupError::RegistryUnreachable`] when nothing answers there.
pub async fn locate_registry(cfg: &ServerConfig) -> Result<Arc<dyn NameRegistry>, StartupError> {
    Endpoint::from_shared(cfg.registry_uri.clone()).map_err(|e| {
        StartupError::InvalidConfig(format!("registry_uri '{}': {e}", cfg.registry_uri))
    })?;

    let registry = GrpcNameRegistry::connect(&cfg.registry_uri, &cfg.registry_client_config())
        .await
        .map_err(|e| StartupError::from_registry(e, &cfg.registry_uri, &cfg.binding_name))?;
    Ok(Arc::new(registry))
}

/// Export `object`, publish it in `registry` and write [`READY_MESSAGE`] to `out`.
///
/// Nothing is written to `out` unless the binding succeeded.
///
/// # Errors
/// Returns the [`StartupError`] of the first step that failed.
pub async fn startup<W: Write + Send>(
    cfg: &ServerConfig,
    registry: Arc<dyn NameRegistry>,
    object: Arc<dyn RemoteMath>,
    out: &mut W,
) -> Result<PublishedServer, StartupError> {
    let listen_addr = cfg.listen_socket_addr()?;
    let exported =
        ExportedObject::export(object, listen_addr, cfg.advertise_host.as_deref()).await?;

    let binding = Binding::new(
        cfg.binding_name.clone(),
        exported.endpoint().clone(),
        SERVICE_NAME,
    );
    let published = match cfg.bind_policy {
        BindPolicy::Reject => registry.bind(binding.clone()).await,
        BindPolicy::Replace => registry.rebind(binding.clone()).await,
    };
    published.map_err(|e| StartupError::from_registry(e, &cfg.registry_uri, &cfg.binding_name))?;

    tracing::info!(
        name = %binding.name,
        endpoint = %binding.endpoint.uri,
        policy = ?cfg.bind_policy,
        "remote object bound"
    );

    if let Err(e) = writeln!(out, "{READY_MESSAGE}").and_then(|()| out.flush()) {
        tracing::warn!(error = %e, "failed to write readiness line");
    }

    Ok(PublishedServer {
        exported,
        binding,
        registry,
        unbind_on_shutdown: cfg.unbind_on_shutdown,
    })
}

/// An exported object whose binding is live in the registry.
pub struct PublishedServer {
    exported: ExportedObject,
    binding: Binding,
    registry: Arc<dyn NameRegistry>,
    unbind_on_shutdown: bool,
}

impl PublishedServer {
    #[must_use]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.exported.local_addr()
    }

    /// Serve calls until `cancel` fires, then withdraw the binding if configured.
    ///
    /// The binding is withdrawn whether serving stopped cleanly or failed.
    ///
    /// # Errors
    /// Returns [`StartupError::Serve`] if the server stops with an error.
    pub async fn serve(self, cancel: CancellationToken) -> Result<(), StartupError> {
        let Self {
            exported,
            binding,
            registry,
            unbind_on_shutdown,
        } = self;

        let served = exported.serve(cancel).await;
        conclude(served, registry.as_ref(), &binding, unbind_on_shutdown).await
    }
}

async fn conclude(
    served: anyhow::Result<()>,
    registry: &dyn NameRegistry,
    binding: &Binding,
    unbind_on_shutdown: bool,
) -> Result<(), StartupError> {
    if unbind_on_shutdown {
        withdraw(registry, binding).await;
    }

    match served {
        Ok(()) => {
            tracing::info!(name = %binding.name, "math server stopped");
            Ok(())
        }
        Err(e) => Err(StartupError::Serve(format!("{e:#}"))),
    }
}

/// Remove `binding` unless the name has since been rebound to another endpoint.
///
/// `NameRegistry` has no conditional unbind, so the check and the removal are
/// two calls. A publisher that rebinds the name between them loses its binding.
async fn withdraw(registry: &dyn NameRegistry, binding: &Binding) {
    match registry.lookup(&binding.name).await {
        Ok(current) if current.endpoint == binding.endpoint => {
            match registry.unbind(&binding.name).await {
                Ok(()) => tracing::info!(name = %binding.name, "binding withdrawn"),
                Err(e) => tracing::warn!(name = %binding.name, error = %e, "unbind failed"),
            }
        }
        Ok(current) => tracing::info!(
            name = %binding.name,
            endpoint = %current.endpoint.uri,
            "name rebound elsewhere, leaving binding in place"
        ),
        Err(e) => tracing::warn!(name = %binding.name, error = %e, "binding lookup on shutdown failed"),
    }
}

/// Locate the registry, publish `object` and serve until `cancel` fires.
///
/// # Errors
/// Returns the [`StartupError`] that stopped the server.
pub async fn run<W: Write + Send>(
    cfg: &ServerConfig,
    object: Arc<dyn RemoteMath>,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<(), StartupError> {
    let registry = locate_registry(cfg).await?;
    let server = startup(cfg, registry, object, out).await?;
    server.serve(cancel).await
}

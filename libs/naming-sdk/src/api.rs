//! Name registry contract
//!
//! Core types and the trait implemented by every registry backend.

use async_trait::async_trait;

use crate::error::RegistryError;

/// Port a registry listens on unless configured otherwise.
pub const DEFAULT_REGISTRY_PORT: u16 = 1099;

/// Registry location used when none is configured: local host, default port.
pub const DEFAULT_REGISTRY_URI: &str = "http://127.0.0.1:1099";

/// Represents an endpoint where a remote object can be reached
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceEndpoint {
    pub uri: String,
}

impl ServiceEndpoint {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    #[must_use]
    pub fn http(host: &str, port: u16) -> Self {
        Self {
            uri: format!("http://{host}:{port}"),
        }
    }
}

/// A published name-to-object association.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    /// Name clients resolve, e.g. `"Compute"`.
    pub name: String,
    /// Where the bound object accepts calls.
    pub endpoint: ServiceEndpoint,
    /// Fully qualified gRPC service name the object implements.
    pub service: String,
}

impl Binding {
    pub fn new(
        name: impl Into<String>,
        endpoint: ServiceEndpoint,
        service: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint,
            service: service.into(),
        }
    }
}

/// Name registry API
///
/// Collision policy follows the classic RMI registry: `bind` refuses a name
/// that is already taken, `rebind` replaces it.
///
/// Implemented by:
/// - [`crate::GrpcNameRegistry`] for an external registry process
/// - [`crate::LocalNameRegistry`] for an in-process map
#[async_trait]
pub trait NameRegistry: Send + Sync {
    /// Publish `binding`; fails with [`RegistryError::AlreadyBound`] if the name is taken.
    async fn bind(&self, binding: Binding) -> Result<(), RegistryError>;

    /// Publish `binding`, replacing any existing binding under the same name.
    async fn rebind(&self, binding: Binding) -> Result<(), RegistryError>;

    /// Remove the binding for `name`.
    async fn unbind(&self, name: &str) -> Result<(), RegistryError>;

    /// Resolve `name` to its binding.
    async fn lookup(&self, name: &str) -> Result<Binding, RegistryError>;

    /// All bound names, sorted.
    async fn list(&self) -> Result<Vec<String>, RegistryError>;
}

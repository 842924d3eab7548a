//! Registry lookup for the remote math SDK
//!
//! Provides `lookup_client` to resolve a bound name into a callable stub.

use std::sync::Arc;

use anyhow::{Result, bail};
use naming_sdk::NameRegistry;
use rmath_transport_grpc::GrpcClientConfig;

use crate::SERVICE_NAME;
use crate::api::RemoteMath;
use crate::client::RemoteMathGrpcClient;

/// Resolve `name` in the registry and connect a `RemoteMath` stub to it.
///
/// This function:
/// 1. Looks the name up in the registry
/// 2. Checks that the bound object implements `RemoteMathService`
/// 3. Connects a gRPC stub to the bound endpoint
///
/// # Errors
/// Returns an error if the name is not bound, is bound to an object of a
/// different interface, or the endpoint cannot be reached.
pub async fn lookup_client(
    registry: &dyn NameRegistry,
    name: &str,
    cfg: &GrpcClientConfig,
) -> Result<Arc<dyn RemoteMath>> {
    let binding = registry.lookup(name).await?;
    if binding.service != SERVICE_NAME {
        bail!(
            "'{name}' is bound to {}, expected {SERVICE_NAME}",
            binding.service
        );
    }

    let client = RemoteMathGrpcClient::connect(&binding.endpoint.uri, cfg).await?;
    tracing::info!(name, uri = %binding.endpoint.uri, "remote math stub connected");
    Ok(Arc::new(client))
}

//! gRPC client implementation of `NameRegistry`

use async_trait::async_trait;
use rmath_transport_grpc::{GrpcClientConfig, connect_with_stack};
use tonic::transport::Channel;

use crate::api::{Binding, NameRegistry, ServiceEndpoint};
use crate::error::RegistryError;
use crate::proto::naming_service_client::NamingServiceClient;
use crate::proto::{BindRequest, ListRequest, LookupRequest, UnbindRequest};

/// Handle to an external registry reached over gRPC.
#[derive(Clone)]
pub struct GrpcNameRegistry {
    inner: NamingServiceClient<Channel>,
    uri: String,
}

impl GrpcNameRegistry {
    /// Connect to the registry at `uri`. A single attempt is made.
    ///
    /// # Errors
    /// Returns [`RegistryError::Unreachable`] if no connection can be
    /// established within the configured connect timeout.
    pub async fn connect(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> Result<Self, RegistryError> {
        let uri = uri.into();
        let channel: Channel = connect_with_stack(uri.clone(), cfg)
            .await
            .map_err(|e| RegistryError::Unreachable(format!("{uri}: {e:#}")))?;

        tracing::debug!(%uri, "connected to name registry");
        Ok(Self {
            inner: NamingServiceClient::new(channel),
            uri,
        })
    }

    /// URI this handle was connected to.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    fn bind_request(binding: Binding) -> BindRequest {
        BindRequest {
            name: binding.name,
            endpoint_uri: binding.endpoint.uri,
            service_name: binding.service,
        }
    }
}

#[async_trait]
impl NameRegistry for GrpcNameRegistry {
    async fn bind(&self, binding: Binding) -> Result<(), RegistryError> {
        let name = binding.name.clone();
        let mut client = self.inner.clone();
        client
            .bind(Self::bind_request(binding))
            .await
            .map_err(|status| RegistryError::from_status(&status, &name))?;
        Ok(())
    }

    async fn rebind(&self, binding: Binding) -> Result<(), RegistryError> {
        let name = binding.name.clone();
        let mut client = self.inner.clone();
        client
            .rebind(Self::bind_request(binding))
            .await
            .map_err(|status| RegistryError::from_status(&status, &name))?;
        Ok(())
    }

    async fn unbind(&self, name: &str) -> Result<(), RegistryError> {
        let mut client = self.inner.clone();
        client
            .unbind(UnbindRequest {
                name: name.to_owned(),
            })
            .await
            .map_err(|status| RegistryError::from_status(&status, name))?;
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Binding, RegistryError> {
        let mut client = self.inner.clone();
        let resp = client
            .lookup(LookupRequest {
                name: name.to_owned(),
            })
            .await
            .map_err(|status| RegistryError::from_status(&status, name))?
            .into_inner();

        Ok(Binding {
            name: resp.name,
            endpoint: ServiceEndpoint::new(resp.endpoint_uri),
            service: resp.service_name,
        })
    }

    async fn list(&self) -> Result<Vec<String>, RegistryError> {
        let mut client = self.inner.clone();
        let resp = client
            .list(ListRequest {})
            .await
            .map_err(|status| RegistryError::from_status(&status, ""))?
            .into_inner();
        Ok(resp.names)
    }
}

//! gRPC server adapter for `NamingService`
//!
//! Hosts any [`NameRegistry`] over gRPC. This crate ships no registry process;
//! the adapter lets an embedder (or a test) expose a [`crate::LocalNameRegistry`].

use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::api::{Binding, NameRegistry, ServiceEndpoint};
use crate::proto::naming_service_server::{NamingService, NamingServiceServer};
use crate::proto::{
    BindRequest, BindResponse, ListRequest, ListResponse, LookupRequest, LookupResponse,
    UnbindRequest, UnbindResponse,
};

/// gRPC service implementation delegating to a `NameRegistry`
#[derive(Clone)]
pub struct NamingServiceImpl {
    registry: Arc<dyn NameRegistry>,
}

impl NamingServiceImpl {
    pub fn new(registry: Arc<dyn NameRegistry>) -> Self {
        Self { registry }
    }
}

fn binding_from(req: BindRequest) -> Binding {
    Binding {
        name: req.name,
        endpoint: ServiceEndpoint::new(req.endpoint_uri),
        service: req.service_name,
    }
}

#[tonic::async_trait]
impl NamingService for NamingServiceImpl {
    async fn bind(&self, request: Request<BindRequest>) -> Result<Response<BindResponse>, Status> {
        self.registry
            .bind(binding_from(request.into_inner()))
            .await?;
        Ok(Response::new(BindResponse {}))
    }

    async fn rebind(
        &self,
        request: Request<BindRequest>,
    ) -> Result<Response<BindResponse>, Status> {
        self.registry
            .rebind(binding_from(request.into_inner()))
            .await?;
        Ok(Response::new(BindResponse {}))
    }

    async fn unbind(
        &self,
        request: Request<UnbindRequest>,
    ) -> Result<Response<UnbindResponse>, Status> {
        self.registry.unbind(&request.into_inner().name).await?;
        Ok(Response::new(UnbindResponse {}))
    }

    async fn lookup(
        &self,
        request: Request<LookupRequest>,
    ) -> Result<Response<LookupResponse>, Status> {
        let binding = self.registry.lookup(&request.into_inner().name).await?;
        Ok(Response::new(LookupResponse {
            name: binding.name,
            endpoint_uri: binding.endpoint.uri,
            service_name: binding.service,
        }))
    }

    async fn list(&self, _request: Request<ListRequest>) -> Result<Response<ListResponse>, Status> {
        let names = self.registry.list().await?;
        Ok(Response::new(ListResponse { names }))
    }
}

/// Create a `NamingService` server backed by the given registry
pub fn make_naming_service(
    registry: Arc<dyn NameRegistry>,
) -> NamingServiceServer<NamingServiceImpl> {
    NamingServiceServer::new(NamingServiceImpl::new(registry))
}

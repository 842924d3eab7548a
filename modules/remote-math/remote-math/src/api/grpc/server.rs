//! gRPC server implementation for the remote math object
//!
//! The server handles gRPC requests and delegates every call to whatever
//! `RemoteMath` implementation it was built with.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use remote_math_sdk::{
    ComputationsRequest, ComputationsResponse, OperandsRequest, RemoteMath, RemoteMathService,
    RemoteMathServiceServer, ResultResponse,
};

/// gRPC service implementation that wraps an exported object.
#[derive(Clone)]
pub struct RemoteMathServiceImpl {
    object: Arc<dyn RemoteMath>,
}

impl RemoteMathServiceImpl {
    pub fn new(object: Arc<dyn RemoteMath>) -> Self {
        Self { object }
    }

    /// Wrap into the generated tonic service.
    #[must_use]
    pub fn into_server(self) -> RemoteMathServiceServer<Self> {
        RemoteMathServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl RemoteMathService for RemoteMathServiceImpl {
    async fn add(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultResponse>, Status> {
        let OperandsRequest { a, b } = request.into_inner();
        let value = self.object.add(a, b).await?;
        Ok(Response::new(ResultResponse { value }))
    }

    async fn subtract(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultResponse>, Status> {
        let OperandsRequest { a, b } = request.into_inner();
        let value = self.object.subtract(a, b).await?;
        Ok(Response::new(ResultResponse { value }))
    }

    async fn multiply(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultResponse>, Status> {
        let OperandsRequest { a, b } = request.into_inner();
        let value = self.object.multiply(a, b).await?;
        Ok(Response::new(ResultResponse { value }))
    }

    async fn divide(
        &self,
        request: Request<OperandsRequest>,
    ) -> Result<Response<ResultResponse>, Status> {
        let OperandsRequest { a, b } = request.into_inner();
        let value = self.object.divide(a, b).await?;
        Ok(Response::new(ResultResponse { value }))
    }

    async fn computations(
        &self,
        _request: Request<ComputationsRequest>,
    ) -> Result<Response<ComputationsResponse>, Status> {
        let count = self.object.computations().await?;
        Ok(Response::new(ComputationsResponse { count }))
    }
}

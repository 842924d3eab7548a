//! gRPC client implementation of `RemoteMath`
//!
//! The stub forwards every call to the exported object over the channel.

use anyhow::Result;
use async_trait::async_trait;
use rmath_transport_grpc::{GrpcClientConfig, connect_with_retry};
use tonic::transport::Channel;

use crate::api::{MathError, RemoteMath};
use crate::proto::remote_math_service_client::RemoteMathServiceClient;
use crate::proto::{ComputationsRequest, OperandsRequest};

/// gRPC client implementation of `RemoteMath`
#[derive(Clone)]
pub struct RemoteMathGrpcClient {
    inner: RemoteMathServiceClient<Channel>,
}

impl RemoteMathGrpcClient {
    /// Connect to an exported remote math object, retrying per `cfg`.
    ///
    /// # Errors
    /// Returns an error if no connection can be established.
    pub async fn connect(uri: impl Into<String>, cfg: &GrpcClientConfig) -> Result<Self> {
        let channel: Channel = connect_with_retry(uri, cfg).await?;
        Ok(Self {
            inner: RemoteMathServiceClient::new(channel),
        })
    }

    fn operands(a: f64, b: f64) -> tonic::Request<OperandsRequest> {
        tonic::Request::new(OperandsRequest { a, b })
    }
}

#[async_trait]
impl RemoteMath for RemoteMathGrpcClient {
    async fn add(&self, a: f64, b: f64) -> Result<f64, MathError> {
        let mut client = self.inner.clone();
        let response = client.add(Self::operands(a, b)).await?;
        Ok(response.into_inner().value)
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, MathError> {
        let mut client = self.inner.clone();
        let response = client.subtract(Self::operands(a, b)).await?;
        Ok(response.into_inner().value)
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, MathError> {
        let mut client = self.inner.clone();
        let response = client.multiply(Self::operands(a, b)).await?;
        Ok(response.into_inner().value)
    }

    async fn divide(&self, a: f64, b: f64) -> Result<f64, MathError> {
        let mut client = self.inner.clone();
        let response = client.divide(Self::operands(a, b)).await?;
        Ok(response.into_inner().value)
    }

    async fn computations(&self) -> Result<u64, MathError> {
        let mut client = self.inner.clone();
        let response = client
            .computations(tonic::Request::new(ComputationsRequest {}))
            .await?;
        Ok(response.into_inner().count)
    }
}

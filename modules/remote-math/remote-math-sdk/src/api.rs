//! Remote math API trait and types
//!
//! Contract implemented by the server-side object and by the client stub.

use async_trait::async_trait;
use tonic::{Code, Status};

/// Remote math API trait
///
/// Arithmetic on `f64` operands. Implementations count every successful arithmetic call
/// they serve.
#[async_trait]
pub trait RemoteMath: Send + Sync {
    async fn add(&self, a: f64, b: f64) -> Result<f64, MathError>;

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, MathError>;

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, MathError>;

    /// Divide `a` by `b`; a zero divisor is an [`MathError::InvalidArgument`].
    async fn divide(&self, a: f64, b: f64) -> Result<f64, MathError>;

    /// Number of successful arithmetic calls served so far.
    async fn computations(&self) -> Result<u64, MathError>;
}

/// Error type for remote math operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("gRPC transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MathError {
    #[must_use]
    pub fn division_by_zero() -> Self {
        Self::InvalidArgument("division by zero".to_owned())
    }
}

impl From<Status> for MathError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::InvalidArgument => Self::InvalidArgument(status.message().to_owned()),
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
                Self::Transport(status.message().to_owned())
            }
            _ => Self::Internal(status.message().to_owned()),
        }
    }
}

impl From<MathError> for Status {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidArgument(msg) => Status::invalid_argument(msg),
            MathError::Transport(msg) => Status::unavailable(msg),
            MathError::Internal(msg) => Status::internal(msg),
        }
    }
}

//! Error type for registry operations

use tonic::{Code, Status};

/// Registry failure, split by what the caller can do about it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry could not be contacted at all.
    #[error("registry unreachable: {0}")]
    Unreachable(String),

    #[error("name already bound: {0}")]
    AlreadyBound(String),

    #[error("name not bound: {0}")]
    NotBound(String),

    /// The registry answered but refused the request.
    #[error("registry rejected request: {0}")]
    Rejected(String),
}

impl RegistryError {
    /// Map a gRPC status returned for an operation on `name`.
    #[must_use]
    pub fn from_status(status: &Status, name: &str) -> Self {
        match status.code() {
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
                Self::Unreachable(status.message().to_owned())
            }
            Code::AlreadyExists => Self::AlreadyBound(name.to_owned()),
            Code::NotFound => Self::NotBound(name.to_owned()),
            _ => Self::Rejected(status.message().to_owned()),
        }
    }

    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

impl From<RegistryError> for Status {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Unreachable(msg) => Status::unavailable(msg),
            RegistryError::AlreadyBound(name) => {
                Status::already_exists(format!("name already bound: {name}"))
            }
            RegistryError::NotBound(name) => Status::not_found(format!("name not bound: {name}")),
            RegistryError::Rejected(msg) => Status::invalid_argument(msg),
        }
    }
}

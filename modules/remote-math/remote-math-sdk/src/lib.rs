//! Remote Math SDK
//!
//! This crate provides everything needed to consume or serve the remote math
//! object:
//! - API trait (`RemoteMath`)
//! - Error types (`MathError`)
//! - Registry lookup returning a ready stub (`lookup_client`)
//! - Proto stubs for server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use remote_math_sdk::{RemoteMath, lookup_client};
//!
//! let math = lookup_client(&registry, "Compute", &cfg).await?;
//! let sum = math.add(1.5, 2.0).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// === API TRAIT AND TYPES ===
mod api;
pub use api::{MathError, RemoteMath};

// === WIRING ===
mod client;
mod wiring;
pub use client::RemoteMathGrpcClient;
pub use wiring::lookup_client;

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for `RemoteMathService`
pub mod proto {
    tonic::include_proto!("remote_math.v1");
}

// Re-export proto types needed by server
pub use proto::remote_math_service_server::{RemoteMathService, RemoteMathServiceServer};
pub use proto::{ComputationsRequest, ComputationsResponse, OperandsRequest, ResultResponse};

/// Service name constant for `RemoteMathService` (stored in registry bindings)
pub const SERVICE_NAME: &str = "remote_math.v1.RemoteMathService";

/// Name the server binds under unless configured otherwise
pub const DEFAULT_BINDING_NAME: &str = "Compute";

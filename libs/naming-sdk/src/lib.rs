//! Name registry SDK
//!
//! This crate provides everything needed to publish and resolve remote objects
//! by name:
//! - Contract trait (`NameRegistry`) and the binding record (`Binding`)
//! - Error type (`RegistryError`)
//! - gRPC client for an external registry (`GrpcNameRegistry`)
//! - In-process registry (`LocalNameRegistry`)
//! - gRPC adapter hosting any `NameRegistry` (`server::make_naming_service`)
//! - `testing::HostedRegistry` behind the `test-util` feature
//!
//! ## Usage
//!
//! ```ignore
//! use naming_sdk::{Binding, GrpcNameRegistry, NameRegistry, ServiceEndpoint};
//!
//! let registry = GrpcNameRegistry::connect(naming_sdk::DEFAULT_REGISTRY_URI, &cfg).await?;
//! registry
//!     .bind(Binding::new("Compute", ServiceEndpoint::http("127.0.0.1", 4000), "svc.v1.Svc"))
//!     .await?;
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// === CONTRACT ===
mod api;
mod error;
pub use api::{Binding, DEFAULT_REGISTRY_PORT, DEFAULT_REGISTRY_URI, NameRegistry, ServiceEndpoint};
pub use error::RegistryError;

// === IMPLEMENTATIONS ===
mod client;
mod local;
pub mod server;
pub use client::GrpcNameRegistry;
pub use local::LocalNameRegistry;

#[cfg(feature = "test-util")]
pub mod testing;

// === GRPC PROTO STUBS ===
/// Generated protobuf types for `NamingService`
pub mod proto {
    tonic::include_proto!("naming.v1");
}

/// Service name constant for `NamingService`
pub const SERVICE_NAME: &str = "naming.v1.NamingService";

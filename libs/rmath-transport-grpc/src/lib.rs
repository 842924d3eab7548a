#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
//! Client-side gRPC transport shared by the registry and remote math stubs.

pub mod client;

pub use client::{GrpcClientConfig, connect_with_retry, connect_with_stack};

//! Remote math server
//!
//! Exports a [`Calculator`] over gRPC and publishes it in a name registry under
//! `"Compute"`, so clients can resolve it with `remote_math_sdk::lookup_client`.
//!
//! ```ignore
//! let cfg = ServerConfig::load(None)?;
//! let cancel = CancellationToken::new();
//! remote_math::run(&cfg, Arc::new(Calculator::new()), cancel, &mut std::io::stdout()).await?;
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod logging;
pub mod signals;

pub use bootstrap::{PublishedServer, READY_MESSAGE, locate_registry, run, startup};
pub use config::{BindPolicy, CliOverrides, ServerConfig};
pub use domain::Calculator;
pub use error::StartupError;
pub use export::ExportedObject;

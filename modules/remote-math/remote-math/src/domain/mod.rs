//! Domain layer for the remote math server
//!
//! Contains the object that gets exported.

pub mod service;

pub use service::Calculator;

//! gRPC transport layer for the exported object

mod server;

pub use server::RemoteMathServiceImpl;

//! HTTP server module.
//!
//! Serves plain HTTP; TLS is expected to be terminated by a reverse proxy or
//! ingress in front of this process. The server includes graceful shutdown on
//! SIGTERM/SIGINT and static asset serving.

mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};

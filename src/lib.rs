//! LLM Platform web frontend.
//!
//! Serves the marketing landing page and the `/api/health` and `/api/ready`
//! probes used by container orchestrators and load balancers.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod report;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::*;

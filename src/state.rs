//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tera::Tera;

use crate::config::AppConfig;
use crate::report::{ProcessProbe, Probe};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub probe: Arc<dyn Probe>,
    started_at: Instant,
}

impl AppState {
    /// Creates state backed by the OS process probe.
    pub fn new(config: AppConfig, tera: Tera) -> Self {
        Self::with_probe(config, tera, Arc::new(ProcessProbe))
    }

    pub fn with_probe(config: AppConfig, tera: Tera, probe: Arc<dyn Probe>) -> Self {
        Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            probe,
            started_at: Instant::now(),
        }
    }

    /// Time elapsed since the state was created at process startup.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

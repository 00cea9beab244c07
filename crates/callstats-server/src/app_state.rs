//! Shared application state for the callstats server.
//!
//! Wires the reference signaling hub to the statistics aggregator. Startup
//! errors are explicit (Result instead of panic).

use std::sync::Arc;

use callstats_core::error::Result;

use crate::config::ServerConfig;
use crate::obs::MetricsRegistry;
use crate::realtime::SignalingHub;
use crate::stats::{SignalingStatistics, StatsOptions};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ServerConfig>,
    hub: Arc<SignalingHub>,
    stats: Arc<SignalingStatistics>,
}

impl AppState {
    /// Build application state around a fresh hub.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        cfg.validate()?;

        let hub = Arc::new(SignalingHub::new());
        let opts = StatsOptions {
            prefix: cfg.metrics.prefix.clone(),
            collect_process_metrics: cfg.metrics.collect_process_metrics,
        };
        let stats = SignalingStatistics::new(hub.as_ref(), &opts)?;

        Ok(Self {
            cfg: Arc::new(cfg),
            hub,
            stats: Arc::new(stats),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.cfg
    }

    pub fn hub(&self) -> Arc<SignalingHub> {
        Arc::clone(&self.hub)
    }

    pub fn stats(&self) -> &SignalingStatistics {
        &self.stats
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        self.stats.registry()
    }
}

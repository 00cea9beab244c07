//! Prefixing wrapper around `prometheus::Registry`.
//!
//! Counters and gauges are integer-valued; histograms take `f64`
//! observations against bucket bounds fixed at registration. Rendering uses
//! the Prometheus text exposition format.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder};

use callstats_core::error::{Result, StatsError};

fn metrics_err(e: prometheus::Error) -> StatsError {
    StatsError::Metrics(e.to_string())
}

/// `count` upper bounds starting at `start`, each `factor` times the previous.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>> {
    prometheus::exponential_buckets(start, factor, count).map_err(metrics_err)
}

pub struct MetricsRegistry {
    registry: Registry,
    prefix: String,
}

impl MetricsRegistry {
    /// Empty registry. An empty `prefix` leaves names untouched.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: Registry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.prefix, name)
        }
    }

    pub fn counter(&self, name: &str, help: &str) -> Result<IntCounter> {
        let c = IntCounter::with_opts(Opts::new(self.full_name(name), help)).map_err(metrics_err)?;
        self.registry.register(Box::new(c.clone())).map_err(metrics_err)?;
        Ok(c)
    }

    pub fn gauge(&self, name: &str, help: &str) -> Result<IntGauge> {
        let g = IntGauge::with_opts(Opts::new(self.full_name(name), help)).map_err(metrics_err)?;
        self.registry.register(Box::new(g.clone())).map_err(metrics_err)?;
        Ok(g)
    }

    pub fn histogram(&self, name: &str, help: &str, buckets: Vec<f64>) -> Result<Histogram> {
        let opts = HistogramOpts::new(self.full_name(name), help).buckets(buckets);
        let h = Histogram::with_opts(opts).map_err(metrics_err)?;
        self.registry.register(Box::new(h.clone())).map_err(metrics_err)?;
        Ok(h)
    }

    /// Register process-wide runtime metrics (memory, CPU, open fds, start
    /// time) into this registry. Only available on Linux.
    #[cfg(target_os = "linux")]
    pub fn collect_process_metrics(&self) -> Result<()> {
        let pc = prometheus::process_collector::ProcessCollector::for_self();
        self.registry.register(Box::new(pc)).map_err(metrics_err)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn collect_process_metrics(&self) -> Result<()> {
        tracing::warn!("process metrics are only collected on linux");
        Ok(())
    }

    /// Names of every registered metric family, sorted.
    pub fn family_names(&self) -> Vec<String> {
        self.registry
            .gather()
            .iter()
            .map(|mf| mf.get_name().to_string())
            .collect()
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }

    /// Render all registered metrics in text exposition format.
    pub fn render(&self) -> Result<String> {
        let families = self.registry.gather();
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf).map_err(metrics_err)?;
        String::from_utf8(buf).map_err(|e| StatsError::Metrics(format!("non-utf8 exposition: {e}")))
    }
}

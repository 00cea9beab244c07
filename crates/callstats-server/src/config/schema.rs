use std::net::SocketAddr;

use serde::Deserialize;
use callstats_core::error::{Result, StatsError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub signaling: SignalingSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            signaling: SignalingSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StatsError::UnsupportedVersion);
        }

        self.signaling.validate()?;
        self.metrics.validate()?;

        Ok(())
    }

    /// Replace listen ports from `SIGNALING_PORT` / `METRICS_PORT`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var("SIGNALING_PORT").ok().as_deref(),
            std::env::var("METRICS_PORT").ok().as_deref(),
        )
    }

    pub fn apply_overrides(&mut self, signaling_port: Option<&str>, metrics_port: Option<&str>) -> Result<()> {
        if let Some(p) = signaling_port {
            self.signaling.listen = with_port(&self.signaling.listen, p, "SIGNALING_PORT")?;
        }
        if let Some(p) = metrics_port {
            self.metrics.listen = with_port(&self.metrics.listen, p, "METRICS_PORT")?;
        }
        Ok(())
    }
}

fn with_port(listen: &str, port: &str, var: &str) -> Result<String> {
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| StatsError::BadRequest(format!("{var} must be a port number, got {port:?}")))?;
    let mut addr = parse_listen(listen, var)?;
    addr.set_port(port);
    Ok(addr.to_string())
}

fn parse_listen(listen: &str, field: &str) -> Result<SocketAddr> {
    listen
        .parse()
        .map_err(|_| StatsError::BadRequest(format!("{field} must be a valid socket address")))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalingSection {
    #[serde(default = "default_signaling_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for SignalingSection {
    fn default() -> Self {
        Self {
            listen: default_signaling_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl SignalingSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen(&self.listen, "signaling.listen")
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(StatsError::BadRequest(
                "signaling.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(StatsError::BadRequest(
                "signaling.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(StatsError::BadRequest(
                "signaling.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub path: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_collect_process_metrics")]
    pub collect_process_metrics: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            listen: default_metrics_listen(),
            path: default_metrics_path(),
            prefix: default_prefix(),
            collect_process_metrics: default_collect_process_metrics(),
        }
    }
}

impl MetricsSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen(&self.listen, "metrics.listen")
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') || self.path.len() < 2 {
            return Err(StatsError::BadRequest(
                "metrics.path must start with '/' and name a route".into(),
            ));
        }
        if self.path == "/healthz" {
            return Err(StatsError::BadRequest("metrics.path must not shadow /healthz".into()));
        }
        if !is_literal_route(&self.path) {
            return Err(StatsError::BadRequest(
                "metrics.path must be a literal route (no ':', '*', '{' or '}' segments)".into(),
            ));
        }
        if !self.prefix.is_empty() && !is_metric_name(&self.prefix) {
            return Err(StatsError::BadRequest(
                "metrics.prefix must match [a-zA-Z_][a-zA-Z0-9_]*".into(),
            ));
        }
        Ok(())
    }
}

/// Route syntax in a segment would register a capture instead of a fixed path.
fn is_literal_route(path: &str) -> bool {
    path.split('/').all(|seg| {
        !seg.starts_with(':') && !seg.starts_with('*') && !seg.contains(['{', '}'])
    })
}

fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_signaling_listen() -> String {
    "0.0.0.0:8010".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_metrics_listen() -> String {
    "0.0.0.0:8020".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_prefix() -> String {
    "calling".into()
}
fn default_collect_process_metrics() -> bool {
    true
}

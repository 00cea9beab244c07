//! Per-kind lifecycle instrumentation.
//!
//! A [`LifecycleBinder`] owns the instruments of one entity kind and, for each
//! created entity, wires peak trackers to its size channels and a one-shot
//! finalizer to its terminal channel.

use std::sync::Arc;

use prometheus::{Histogram, IntCounter, IntGauge};
use tokio::time::Instant;
use tracing::{debug, warn};

use callstats_core::error::Result;
use callstats_core::event::{EventChannel, Subscription};
use callstats_core::signaling::{Namespace, Room, User};

use crate::obs::MetricsRegistry;
use crate::stats::peak::PeakTracker;

/// One size-tracked sub-collection of an entity.
pub struct Watched<'a> {
    pub initial: usize,
    pub changed: &'a EventChannel<usize>,
}

/// How an entity kind exposes its lifecycle to a binder.
pub trait Lifecycle {
    fn terminal(&self) -> &EventChannel<()>;

    /// Sub-collections in the same order as the binder's peak histograms.
    fn watched(&self) -> Vec<Watched<'_>> {
        Vec::new()
    }
}

impl Lifecycle for dyn User {
    fn terminal(&self) -> &EventChannel<()> {
        self.left()
    }
}

impl Lifecycle for dyn Room {
    fn terminal(&self) -> &EventChannel<()> {
        self.closed()
    }

    fn watched(&self) -> Vec<Watched<'_>> {
        vec![Watched { initial: self.peer_count(), changed: self.peers_changed() }]
    }
}

impl Lifecycle for dyn Namespace {
    fn terminal(&self) -> &EventChannel<()> {
        self.closed()
    }

    fn watched(&self) -> Vec<Watched<'_>> {
        vec![
            Watched { initial: self.subscribed_count(), changed: self.subscribed_changed() },
            Watched { initial: self.registered_count(), changed: self.registered_changed() },
            Watched { initial: self.room_count(), changed: self.rooms_changed() },
        ]
    }
}

/// Peak histogram declaration.
#[derive(Debug, Clone)]
pub struct PeakSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub buckets: Vec<f64>,
}

/// Instrument declarations for one entity kind.
#[derive(Debug, Clone)]
pub struct KindSpec {
    /// Name stem: instruments are `<kind>_count`, `<kind>_concurrent`, `<kind>_duration`.
    pub kind: &'static str,
    pub count_help: &'static str,
    pub concurrent_help: &'static str,
    pub duration_help: &'static str,
    pub duration_buckets: Vec<f64>,
    pub peaks: Vec<PeakSpec>,
}

pub struct LifecycleBinder {
    kind: &'static str,
    count: IntCounter,
    concurrent: IntGauge,
    duration: Histogram,
    peaks: Vec<Histogram>,
}

impl LifecycleBinder {
    /// Register the kind's instruments into `registry`.
    pub fn register(registry: &MetricsRegistry, spec: KindSpec) -> Result<Self> {
        let count = registry.counter(&format!("{}_count", spec.kind), spec.count_help)?;
        let concurrent = registry.gauge(&format!("{}_concurrent", spec.kind), spec.concurrent_help)?;
        let duration = registry.histogram(
            &format!("{}_duration", spec.kind),
            spec.duration_help,
            spec.duration_buckets,
        )?;
        let peaks = spec
            .peaks
            .into_iter()
            .map(|p| registry.histogram(p.name, p.help, p.buckets))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { kind: spec.kind, count, concurrent, duration, peaks })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn count(&self) -> &IntCounter {
        &self.count
    }

    pub fn concurrent(&self) -> &IntGauge {
        &self.concurrent
    }

    pub fn duration(&self) -> &Histogram {
        &self.duration
    }

    pub fn peaks(&self) -> &[Histogram] {
        &self.peaks
    }

    /// Start tracking a freshly created entity.
    ///
    /// Nothing here keeps the entity alive: only subscriptions on its
    /// channels are held, and the terminal listener cancels them.
    pub fn on_created<E: Lifecycle + ?Sized>(&self, entity: &E) {
        let started = Instant::now();

        let watched = entity.watched();
        if watched.len() != self.peaks.len() {
            warn!(
                kind = self.kind,
                watched = watched.len(),
                peaks = self.peaks.len(),
                "watched collections do not match peak histograms"
            );
        }

        let mut trackers: Vec<(Arc<PeakTracker>, Histogram)> = Vec::with_capacity(self.peaks.len());
        let mut changes: Vec<Subscription> = Vec::with_capacity(self.peaks.len());
        for (w, hist) in watched.iter().zip(&self.peaks) {
            let tracker = Arc::new(PeakTracker::new(w.initial));
            let t = Arc::clone(&tracker);
            changes.push(w.changed.on(move |len| t.record(*len)));
            trackers.push((tracker, hist.clone()));
        }

        self.count.inc();
        self.concurrent.inc();
        debug!(kind = self.kind, "entity tracked");

        let kind = self.kind;
        let concurrent = self.concurrent.clone();
        let duration = self.duration.clone();
        entity
            .terminal()
            .once(move |_| {
                concurrent.dec();
                let elapsed = started.elapsed().as_secs_f64();
                duration.observe(elapsed);
                for (tracker, hist) in &trackers {
                    hist.observe(tracker.read() as f64);
                }
                for sub in changes {
                    sub.cancel();
                }
                debug!(kind, elapsed_secs = elapsed, "entity finalized");
            })
            .disarm();
    }
}

//! Signaling statistics: lifecycle-driven metrics over users, rooms and
//! namespaces of a signaling engine.
//!
//! `SignalingStatistics` is the composition root. It owns the registry,
//! builds one [`LifecycleBinder`] per entity kind the engine exposes and
//! keeps the creation-channel subscriptions alive for its own lifetime.

pub mod binder;
pub mod peak;

use std::sync::Arc;

use tracing::info;

use callstats_core::error::Result;
use callstats_core::event::Subscription;
use callstats_core::signaling::Signaling;

use crate::obs::{exponential_buckets, MetricsRegistry};

pub use binder::{KindSpec, Lifecycle, LifecycleBinder, PeakSpec, Watched};
pub use peak::{Membership, PeakTracker};

/// Room occupancy bounds: small groups, dense at the low end.
const ROOM_PEAK_BUCKETS: [f64; 11] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 14.0, 22.0];

/// 10s .. 40960s (~11.4h).
fn duration_buckets() -> Result<Vec<f64>> {
    exponential_buckets(10.0, 2.0, 13)
}

/// 1 .. 2048.
fn namespace_peak_buckets() -> Result<Vec<f64>> {
    exponential_buckets(1.0, 2.0, 12)
}

#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Instrument name prefix (`calling` gives `calling_user_count`).
    pub prefix: String,
    /// Also register process-wide runtime metrics.
    pub collect_process_metrics: bool,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            prefix: "calling".into(),
            collect_process_metrics: false,
        }
    }
}

pub struct SignalingStatistics {
    registry: MetricsRegistry,
    users: Arc<LifecycleBinder>,
    rooms: Option<Arc<LifecycleBinder>>,
    namespaces: Option<Arc<LifecycleBinder>>,
    _subscriptions: Vec<Subscription>,
}

impl SignalingStatistics {
    /// Register instruments and attach to `signaling`'s creation channels.
    /// No I/O happens here.
    pub fn new(signaling: &dyn Signaling, opts: &StatsOptions) -> Result<Self> {
        let registry = MetricsRegistry::new(opts.prefix.clone());
        let mut subscriptions = Vec::new();

        let users = Arc::new(LifecycleBinder::register(&registry, user_spec()?)?);
        let binder = Arc::clone(&users);
        subscriptions.push(signaling.new_user().on(move |user| binder.on_created(&**user)));

        let rooms = match signaling.rooms() {
            Some(room_registry) => {
                let rooms = Arc::new(LifecycleBinder::register(&registry, room_spec()?)?);
                let binder = Arc::clone(&rooms);
                subscriptions.push(room_registry.new_room().on(move |room| binder.on_created(&**room)));
                Some(rooms)
            }
            None => None,
        };

        let namespaces = match signaling.namespaces() {
            Some(ns_registry) => {
                let namespaces = Arc::new(LifecycleBinder::register(&registry, namespace_spec()?)?);
                let binder = Arc::clone(&namespaces);
                subscriptions.push(ns_registry.new_namespace().on(move |ns| binder.on_created(&**ns)));
                Some(namespaces)
            }
            None => None,
        };

        if opts.collect_process_metrics {
            registry.collect_process_metrics()?;
        }

        info!(
            prefix = %opts.prefix,
            rooms = rooms.is_some(),
            namespaces = namespaces.is_some(),
            process = opts.collect_process_metrics,
            "signaling statistics attached"
        );

        Ok(Self {
            registry,
            users,
            rooms,
            namespaces,
            _subscriptions: subscriptions,
        })
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    pub fn user_binder(&self) -> &LifecycleBinder {
        &self.users
    }

    pub fn room_binder(&self) -> Option<&LifecycleBinder> {
        self.rooms.as_deref()
    }

    pub fn namespace_binder(&self) -> Option<&LifecycleBinder> {
        self.namespaces.as_deref()
    }
}

fn user_spec() -> Result<KindSpec> {
    Ok(KindSpec {
        kind: "user",
        count_help: "Amount of users that join",
        concurrent_help: "Amount of concurrent users",
        duration_help: "Time user was connected",
        duration_buckets: duration_buckets()?,
        peaks: Vec::new(),
    })
}

fn room_spec() -> Result<KindSpec> {
    Ok(KindSpec {
        kind: "room",
        count_help: "Amount of rooms created",
        concurrent_help: "Amount of concurrent rooms",
        duration_help: "Time room was active",
        duration_buckets: duration_buckets()?,
        peaks: vec![PeakSpec {
            name: "room_members_peak",
            help: "Peak amount of room members",
            buckets: ROOM_PEAK_BUCKETS.to_vec(),
        }],
    })
}

fn namespace_spec() -> Result<KindSpec> {
    Ok(KindSpec {
        kind: "namespace",
        count_help: "Amount of namespaces created",
        concurrent_help: "Amount of concurrent namespaces",
        duration_help: "Time namespace was active",
        duration_buckets: duration_buckets()?,
        peaks: vec![
            PeakSpec {
                name: "namespace_subscribe_peak",
                help: "Peak amount of namespace subscribed users",
                buckets: namespace_peak_buckets()?,
            },
            PeakSpec {
                name: "namespace_register_peak",
                help: "Peak amount of namespace registered users",
                buckets: namespace_peak_buckets()?,
            },
            PeakSpec {
                name: "namespace_room_peak",
                help: "Peak amount of namespace registered rooms",
                buckets: namespace_peak_buckets()?,
            },
        ],
    })
}

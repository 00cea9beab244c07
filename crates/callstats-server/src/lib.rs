//! callstats server library entry.
//!
//! Wires the signaling statistics aggregator, its Prometheus registry bridge,
//! the ops endpoints and a reference signaling hub with its WebSocket
//! transport. Consumed by the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod stats;
pub mod transport;

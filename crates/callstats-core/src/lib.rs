//! callstats core: error types, typed event channels, the signaling contract
//! observed by the aggregator, and the text wire envelope.
//!
//! This crate carries no transport or runtime dependencies so the contract can
//! be implemented by any signaling engine and by test doubles.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Metrics collection
//! must never take down the signaling service it observes, so all fallible
//! paths surface as `StatsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod event;
pub mod protocol;
pub mod signaling;

/// Shared result type.
pub use error::{Result, StatsError};
pub use event::{EventChannel, Subscription};

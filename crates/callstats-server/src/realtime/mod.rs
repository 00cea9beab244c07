//! Reference in-process signaling hub.
//!
//! Implements the observer contract of `callstats_core::signaling` for
//! connected peers and rooms so the server has a live event source. It has no
//! namespace capability.

pub mod hub;

pub use hub::{HubRoom, Peer, RoomDirectory, SignalingHub};

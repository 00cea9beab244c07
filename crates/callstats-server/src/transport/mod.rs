//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler that drives the reference signaling hub.

pub mod ws;

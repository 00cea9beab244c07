//! Wire format spoken by the reference signaling hub.
//!
//! Text-only: JSON envelopes with an optional lazily-parsed payload. Parsing
//! is panic-free; malformed input surfaces as `StatsError::BadRequest`.

pub mod text;

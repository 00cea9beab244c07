//! Top-level facade crate for callstats.
//!
//! Re-exports the core contracts and the server library so users can depend on a single crate.

pub mod core {
    pub use callstats_core::*;
}

pub mod server {
    pub use callstats_server::*;
}

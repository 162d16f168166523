#![doc(test(attr(deny(warnings))))]

//! Pundi is a personal finance client: an optimistic sync layer over a hosted
//! spreadsheet backend plus the dashboard and history derivations on top.
//!
//! The heavy lifting lives in the workspace crates; this crate wires them
//! together behind the `pundi_cli` binary.

pub mod cli;
pub mod errors;
pub mod utils;

pub use pundi_backend_http as backend_http;
pub use pundi_config as config;
pub use pundi_core as engine;
pub use pundi_domain as domain;

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, preferring `filter` over `RUST_LOG` and the
/// default directive. Only the first call has any effect.
pub fn init_with_filter(filter: Option<&str>) {
    if utils::init_tracing(filter) {
        tracing::info!("Pundi tracing initialized.");
    }
}

pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "pundi=info";

static TRACING_INIT: Once = Once::new();

/// Installs the global tracing subscriber, writing to stderr so command
/// output on stdout stays clean.
///
/// Returns `true` on the call that performed the installation.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let filter = build_filter(filter);
        installed = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok();
    });
    installed
}

fn build_filter(explicit: Option<&str>) -> EnvFilter {
    if let Some(filter) = explicit.and_then(|directive| EnvFilter::try_new(directive).ok()) {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

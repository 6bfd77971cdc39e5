//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter such as `"scene_reconciler=debug"`
///
/// Returns `false` when a logger was already installed.
pub fn init_with_filter(filter: &str) -> bool {
    env_logger::Builder::from_default_env()
        .parse_filters(filter)
        .try_init()
        .is_ok()
}

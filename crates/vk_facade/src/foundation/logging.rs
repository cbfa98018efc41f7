//! Logging setup and re-exports

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with `level` as the default filter
///
/// `RUST_LOG` still takes precedence when set. Calling this twice is
/// harmless; the second logger is ignored.
pub fn init_with_level(level: log::LevelFilter) {
    let filter = default_filter(level);
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
}

fn default_filter(level: log::LevelFilter) -> String {
    level.to_string().to_lowercase()
}

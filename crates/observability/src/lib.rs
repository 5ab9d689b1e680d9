//! Tracing and logging setup shared by model applications and tools.

/// Initialize process-wide tracing/logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Environment-driven configuration.
pub mod config;

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
pub use self::tracing::{init_with, try_init_with};

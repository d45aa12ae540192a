//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide logging with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize process-wide logging with the given output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{init_for_tests, LogFormat};

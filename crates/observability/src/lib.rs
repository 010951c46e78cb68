//! Shared logging setup for warung binaries.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    logging::init(logging::DEFAULT_DIRECTIVE);
}

/// Log subscriber configuration (filters, formatter).
pub mod logging;

//! Tracing/logging setup shared by the binaries.

/// Initialize process-wide JSON logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::Json);
}

/// Initialize human-readable logging on stderr (interactive terminal use).
pub fn init_pretty() {
    tracing::init(tracing::LogFormat::Compact);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

//! Tracing/logging setup shared by every AdminGuard binary.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging with an `info` default filter and the
/// format named by `ADMINGUARD_LOG_FORMAT`.
///
/// Safe to call repeatedly.
pub fn init() {
    tracing::init("info", LogFormat::from_env());
}

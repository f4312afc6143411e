//! Logging bootstrap
//!
//! Library code logs through the `log` facade as `event=... module=...`
//! key-value lines. The binary routes them to stderr with `flexi_logger`,
//! so stdout carries only command output.

use flexi_logger::{Logger, LoggerHandle};

/// Accepted log levels
pub const LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Starts stderr logging at `level`; `RUST_LOG` takes precedence when set.
///
/// Keep the returned handle alive for the life of the process.
pub fn init_logging(level: &str) -> Result<LoggerHandle, String> {
    if !LEVELS.contains(&level) {
        return Err(format!("unsupported log level `{level}`"));
    }

    Logger::try_with_env_or_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}

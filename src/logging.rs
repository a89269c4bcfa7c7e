//! Logging helpers built on the `log` facade, with `env_logger` as the
//! default backend and a hex dump utility for protocol debugging.

use log::{debug, error, info, log_enabled, warn, Level};

/// Initializes the logger with the `env_logger` crate.
pub fn init_logger() {
    env_logger::init();
}

/// Logs an error message.
pub fn log_error(message: &str) {
    if log_enabled!(Level::Error) {
        error!("{message}");
    }
}

/// Logs a warning message.
pub fn log_warn(message: &str) {
    if log_enabled!(Level::Warn) {
        warn!("{message}");
    }
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}

/// Logs a debug message.
pub fn log_debug(message: &str) {
    if log_enabled!(Level::Debug) {
        debug!("{message}");
    }
}

/// Logs a frame buffer as uppercase hex at debug level, e.g.
/// `TX (5 bytes): 10 5B 01 5C 16`.
pub fn log_frame_hex(label: &str, data: &[u8]) {
    if log_enabled!(Level::Debug) {
        let hex_str = data
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        debug!("{} ({} bytes): {}", label, data.len(), hex_str);
    }
}

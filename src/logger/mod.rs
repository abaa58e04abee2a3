//! Structured logging for burnswap
//!
//! Clean, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<tag> flags
//! - Dual output: colored console (stderr) + file persistence
//!
//! stdout is reserved for the notification stream of the event bridge, so
//! console logs never go there.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use burnswap::logger::{self, LogTag};
//!
//! logger::error(LogTag::Rpc, "Connection failed");
//! logger::info(LogTag::Transactions, "Transaction submitted");
//! logger::debug(LogTag::Swap, "Quote details: ..."); // Only if --debug-swap
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Must be called once at startup, before services are built. Reads debug
/// flags from the command line and opens the log file when enabled.
pub fn init(file_enabled: bool, directory: &str) {
    config::init_from_args();

    if file_enabled {
        if let Err(e) = file::init_file_logging(directory) {
            eprintln!("⚠️  File logging disabled: {}", e);
        }
    }
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level, only shown with --debug-<tag>
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level, only shown with --verbose or --verbose-<tag>
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
pub fn flush() {
    file::flush_file_logging();
}

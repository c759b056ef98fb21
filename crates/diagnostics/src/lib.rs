// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by every datalake-connect crate
//!
//! Usage:
//! - Set DLCONNECT_LOG=off (default) - no logs
//! - Set DLCONNECT_LOG=info - endpoint selection and client construction
//! - Set DLCONNECT_LOG=debug - every probe and connect attempt

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "DLCONNECT_LOG";

static INIT: Once = Once::new();

/// Map a level name to an emit level. `Ok(None)` means logging is off.
pub fn parse_level(name: &str) -> Result<Option<emit::Level>, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" | "" => Ok(None),
        "debug" => Ok(Some(emit::Level::Debug)),
        "info" => Ok(Some(emit::Level::Info)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "error" => Ok(Some(emit::Level::Error)),
        other => Err(other.to_string()),
    }
}

/// Initialize diagnostics from the DLCONNECT_LOG environment variable
///
/// Safe to call multiple times; only the first call has an effect.
pub fn init_diagnostics() {
    init_with_level(None);
}

/// Initialize diagnostics, preferring `level` over DLCONNECT_LOG when given.
pub fn init_with_level(level: Option<&str>) {
    INIT.call_once(|| {
        let requested = match level {
            Some(l) => l.to_string(),
            None => std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string()),
        };

        let min = match parse_level(&requested) {
            Ok(None) => return,
            Ok(Some(min)) => min,
            Err(unknown) => {
                // Bootstrap warning, emitted before the runtime exists
                eprintln!("Warning: Unknown {LOG_ENV} value '{unknown}', using 'info'");
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        // The runtime lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Log basic operations (resolved endpoints, constructed clients)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (individual attempts, request URLs)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable failures, such as a candidate that did not answer
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that end an operation
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_with_level(Some("debug"));
        init_diagnostics();
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("off"), Ok(None));
        assert_eq!(parse_level(" WARN "), Ok(Some(emit::Level::Warn)));
        assert_eq!(parse_level("debug"), Ok(Some(emit::Level::Debug)));
        assert_eq!(parse_level("loud"), Err("loud".to_string()));
    }

    #[test]
    fn test_macros_compile() {
        log_info!("Test message");
        log_debug!("Debug message with {value}", value: 42);
        warn!("Warning message");
        error!("Error message");
    }

    #[test]
    fn test_macros_take_local_properties() {
        init_with_level(Some("debug"));
        let candidate = "http://nn1:50070".to_string();
        let remaining = 2usize;
        let reason = "connection refused";
        debug!("Trying {candidate} ({remaining} left)", candidate, remaining);
        warn!("Endpoint {candidate} is not active: {reason}", candidate, reason);
        log_info!("Selected {candidate}", candidate);
    }
}

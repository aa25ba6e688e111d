// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging setup shared by the tablefs crates.
//!
//! Usage:
//! - Set TABLEFS_LOG=off (default) - no logs
//! - Set TABLEFS_LOG=info - mount and listing logs
//! - Set TABLEFS_LOG=debug - every open, list and lookup call
//!
//! The `--debug` flag of the binary forces the debug level regardless
//! of the environment.

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "TABLEFS_LOG";

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Parse a level name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "" => Some(Level::Off),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    fn as_emit(self) -> Option<emit::Level> {
        match self {
            Level::Off => None,
            Level::Error => Some(emit::Level::Error),
            Level::Warn => Some(emit::Level::Warn),
            Level::Info => Some(emit::Level::Info),
            Level::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Pick the effective level from the environment value and the debug flag.
pub fn select_level(env_value: Option<&str>, force_debug: bool) -> (Level, bool) {
    if force_debug {
        return (Level::Debug, true);
    }
    match env_value {
        None => (Level::Off, true),
        Some(v) => match Level::parse(v) {
            Some(level) => (level, true),
            None => (Level::Info, false),
        },
    }
}

/// Initialize diagnostics from TABLEFS_LOG.
///
/// Safe to call multiple times; only the first call has an effect.
pub fn init_diagnostics() {
    init_with_debug(false)
}

/// Initialize diagnostics, forcing debug output when `force_debug` is set.
pub fn init_with_debug(force_debug: bool) {
    INIT.call_once(|| {
        let env_value = std::env::var(LOG_ENV).ok();
        let (level, known) = select_level(env_value.as_deref(), force_debug);

        let Some(min) = level.as_emit() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        if !known {
            let value = env_value.unwrap_or_default();
            emit::warn!("unknown TABLEFS_LOG value {value}, using info", value: value);
        }

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
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

/// Using "error" instead of "fatal" for consistency with emit-rs
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/*
 * logging.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of buzz_core, a client library for the Buzz activity API.
 *
 * buzz_core is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * buzz_core is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with buzz_core.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Optional stderr logging bootstrap for applications embedding the client.
//!
//! The library itself only emits through the `log` facade. Applications that
//! have no logger of their own can call [`init_logging`] once at startup.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::{BuzzError, Result};

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Start logging to stderr at `level` (trace|debug|info|warn|error).
///
/// Repeated calls with the same level are no-ops; a different level is rejected.
pub fn init_logging(level: &str) -> Result<()> {
    let level = normalize_level(level)?;
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        let logger = Logger::try_with_str(level)
            .map_err(|err| BuzzError::logging(format!("invalid log level `{level}`: {err}")))?
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .start()
            .map_err(|err| BuzzError::logging(format!("failed to start logger: {err}")))?;
        info!("logging started at level {} (buzz_core {})", level, env!("CARGO_PKG_VERSION"));
        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;
    if state.level != level {
        return Err(BuzzError::logging(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        )));
    }
    Ok(())
}

/// Level logging was started with, if any.
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(BuzzError::logging(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert_eq!(normalize_level("debug").unwrap(), "debug");
        assert!(matches!(normalize_level("verbose"), Err(BuzzError::Logging(_))));
    }

    #[test]
    fn test_unknown_level_does_not_initialize() {
        assert!(matches!(init_logging("loud"), Err(BuzzError::Logging(_))));
        assert_eq!(logging_level(), None);
    }
}

/*
 * error.rs
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

//! Client errors: authentication, transport, parsing and validation failures.

use thiserror::Error;

/// Errors from any client operation. None of these are retried internally.
#[derive(Debug, Error)]
pub enum BuzzError {
    /// OAuth handshake, signing or token refresh failed.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Connection or I/O failure, or a non-2xx response (status and body attached).
    #[error("{}", transport_message(.message, .status))]
    Transport {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },
    /// The response was not well-formed XML or ended before its root element closed.
    #[error("parsing failed: {0}")]
    Parsing(String),
    /// Caller-supplied content is missing fields required to build a request payload.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The stderr logger could not be started, or was already started at another level.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

fn transport_message(message: &str, status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("transport failed ({}): {}", code, message),
        None => format!("transport failed: {}", message),
    }
}

impl BuzzError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn parsing(msg: impl Into<String>) -> Self {
        Self::Parsing(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// I/O-level failure with no HTTP response.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            status: None,
            body: None,
        }
    }

    /// Non-2xx response; the error body is kept so callers can decode it.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            message: "server returned an error response".to_string(),
            status: Some(status),
            body: Some(body.into()),
        }
    }

    /// Error body text of a failed HTTP exchange, if any.
    pub fn error_body(&self) -> Option<&str> {
        match self {
            BuzzError::Transport { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for BuzzError {
    fn from(e: quick_xml::Error) -> Self {
        BuzzError::Parsing(e.to_string())
    }
}

impl From<std::io::Error> for BuzzError {
    fn from(e: std::io::Error) -> Self {
        BuzzError::io(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BuzzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_includes_status() {
        let e = BuzzError::http_status(401, "<error/>");
        assert_eq!(e.to_string(), "transport failed (401): server returned an error response");
        assert_eq!(e.error_body(), Some("<error/>"));
    }

    #[test]
    fn test_io_display() {
        let e = BuzzError::io("connection reset");
        assert_eq!(e.to_string(), "transport failed: connection reset");
        assert_eq!(e.error_body(), None);
    }
}

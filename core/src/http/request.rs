/*
 * request.rs
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

//! HTTP request: method, absolute URL, headers, optional body.

use std::collections::HashMap;

use crate::error::{BuzzError, Result};

pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Request handed to a [`Transport`](super::Transport).
///
/// Header names are stored as given; lookups via [`Request::header_value`] are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Add or replace a header (an existing header differing only in case is replaced).
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set the body without touching headers.
    pub fn body(&mut self, data: Vec<u8>) -> &mut Self {
        self.body = Some(data);
        self
    }

    /// Attach a body with an explicit `Content-Length` (bytes) and, unless the
    /// caller already set one, `Content-Type: application/atom+xml`.
    pub fn add_body(&mut self, data: Vec<u8>) -> &mut Self {
        self.header("Content-Length", data.len().to_string());
        if self.header_value("Content-Type").is_none() {
            self.header("Content-Type", ATOM_CONTENT_TYPE);
        }
        self.body(data)
    }

    /// URL without its query string.
    pub fn base_url(&self) -> &str {
        match self.url.find('?') {
            Some(i) => &self.url[..i],
            None => &self.url,
        }
    }

    /// Raw query string after `?`, if any.
    pub fn query(&self) -> Option<&str> {
        self.url.find('?').map(|i| &self.url[i + 1..])
    }

    /// True when the body is an HTML form (its parameters take part in OAuth1 signing).
    pub fn has_form_body(&self) -> bool {
        self.body.is_some()
            && self
                .header_value("Content-Type")
                .map(|ct| ct.trim_start().starts_with(FORM_CONTENT_TYPE))
                .unwrap_or(false)
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Pass 2xx responses through; anything else becomes a transport error carrying the body.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BuzzError::http_status(self.status, self.text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_body_sets_length_and_atom_type() {
        let mut req = Request::post("https://example.com/a");
        req.add_body("héllo".as_bytes().to_vec());
        assert_eq!(req.header_value("content-length"), Some("6"));
        assert_eq!(req.header_value("Content-Type"), Some(ATOM_CONTENT_TYPE));
    }

    #[test]
    fn test_add_body_keeps_caller_content_type() {
        let mut req = Request::post("https://example.com/token");
        req.header("content-type", FORM_CONTENT_TYPE);
        req.add_body(b"a=b".to_vec());
        assert_eq!(req.header_value("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert!(req.has_form_body());
    }

    #[test]
    fn test_header_replaces_case_insensitively() {
        let mut req = Request::get("https://example.com");
        req.header("authorization", "a").header("Authorization", "b");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header_value("AUTHORIZATION"), Some("b"));
    }

    #[test]
    fn test_base_url_and_query() {
        let req = Request::get("https://example.com/p?x=1&y=2");
        assert_eq!(req.base_url(), "https://example.com/p");
        assert_eq!(req.query(), Some("x=1&y=2"));
        assert_eq!(Request::get("https://example.com/p").query(), None);
    }

    #[test]
    fn test_error_for_status() {
        assert!(Response::new(204, Vec::new()).error_for_status().is_ok());
        let err = Response::new(403, "denied").error_for_status().unwrap_err();
        assert_eq!(err.error_body(), Some("denied"));
    }
}

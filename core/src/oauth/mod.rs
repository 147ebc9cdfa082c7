/*
 * mod.rs
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

//! Request authorization: OAuth 1.0a (HMAC-SHA1) and OAuth 2.0 (authorization code + refresh).
//!
//! Both strategies implement [`Authorizer`]. The client facade holds one as a
//! trait object and calls [`Authorizer::sign`] on every authenticated request.

mod oauth1;
mod oauth2;

pub use oauth1::OAuth1;
pub use oauth2::{OAuth2, OAuth2State};

use chrono::Utc;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::Result;
use crate::http::{Request, Transport};

/// Read-only access to activities and profiles.
pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/buzz.readonly";
/// Read-write access (posting, commenting, following).
pub const WRITE_SCOPE: &str = "https://www.googleapis.com/auth/buzz";
/// Out-of-band callback: the provider shows the verifier to the user instead of redirecting.
pub const OUT_OF_BAND_CALLBACK: &str = "oob";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthVersion {
    V1,
    V2,
}

impl OAuthVersion {
    pub fn number(&self) -> u8 {
        match self {
            OAuthVersion::V1 => 1,
            OAuthVersion::V2 => 2,
        }
    }
}

/// Authorization strategy used by the client facade.
///
/// Signing takes `&mut self`: OAuth2 may refresh its access token in place, so an
/// authorizer has exactly one owner at a time.
pub trait Authorizer {
    fn version(&self) -> OAuthVersion;

    /// Record the consumer (client) credentials for `scope` without contacting the server.
    fn set_consumer(&mut self, key: &str, secret: &str, scope: &str);

    /// URL the user must visit to grant access. OAuth1 fetches a request token first.
    fn authentication_url(
        &mut self,
        transport: &dyn Transport,
        scope: &str,
        key: &str,
        secret: &str,
        callback: &str,
    ) -> Result<String>;

    /// Trade the verifier (OAuth1) or authorization code (OAuth2) for an access token.
    fn exchange_for_access_token(
        &mut self,
        transport: &dyn Transport,
        code: &str,
        redirect_uri: &str,
    ) -> Result<()>;

    /// Install a previously obtained token pair. For OAuth2 the second value is the refresh token.
    fn set_token_with_secret(&mut self, token: &str, secret: &str);

    fn token(&self) -> Option<&str>;

    fn token_secret(&self) -> Option<&str>;

    /// Add an `Authorization` header to `request`.
    fn sign(&mut self, transport: &dyn Transport, request: &mut Request) -> Result<()>;
}

/// RFC 3986 unreserved characters pass through; everything else is percent-encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub(crate) fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

/// Decode one `application/x-www-form-urlencoded` component (`+` is a space).
pub(crate) fn form_decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Split a query string or form body into decoded pairs, keeping order and duplicates.
pub(crate) fn parse_form(s: &str) -> Vec<(String, String)> {
    s.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (form_decode(k), form_decode(v)),
            None => (form_decode(pair), String::new()),
        })
        .collect()
}

/// Encode pairs as `k=v&k=v` in the given order.
pub(crate) fn encode_form<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k.as_ref()), percent_encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

/// Current Unix time in seconds.
pub(crate) fn now_secs() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode_unreserved() {
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(percent_encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(
            percent_encode(WRITE_SCOPE),
            "https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fbuzz"
        );
    }

    #[test]
    fn test_parse_form() {
        let pairs = parse_form("oauth_token=ab%2Fc&oauth_token_secret=x+y&flag");
        assert_eq!(
            pairs,
            vec![
                ("oauth_token".to_string(), "ab/c".to_string()),
                ("oauth_token_secret".to_string(), "x y".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert!(parse_form("").is_empty());
    }

    #[test]
    fn test_encode_form() {
        assert_eq!(encode_form(&[("a", "1 2"), ("b", "x/y")]), "a=1%202&b=x%2Fy");
    }
}

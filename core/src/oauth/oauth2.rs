/*
 * oauth2.rs
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

//! OAuth 2.0 authorization-code flow with transparent refresh.
//!
//! The access token is presented as `Authorization: OAuth <token>`. Before each
//! signature the expiry is checked; within five minutes of expiry (or when no
//! expiry is known) the refresh token is traded for a new access token first.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Deserialize;

use crate::config::OAuth2Endpoints;
use crate::error::{BuzzError, Result};
use crate::http::{Request, Transport, FORM_CONTENT_TYPE};

use super::{encode_form, now_secs, percent_encode, Authorizer, OAuthVersion};

/// Refresh the token if it expires within this window.
const REFRESH_THRESHOLD_SECS: i64 = 300;
/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

const AUTHORIZATION_CODE: &str = "authorization_code";
const REFRESH_TOKEN: &str = "refresh_token";

/// Where an [`OAuth2`] authorizer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OAuth2State {
    /// No client credentials yet.
    #[default]
    Unconfigured,
    /// Client credentials known; waiting for an authorization code or a stored token.
    AwaitingCode,
    /// An access token is available.
    Authorized,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct OAuth2 {
    endpoints: OAuth2Endpoints,
    client_id: Option<String>,
    client_secret: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
    /// Unix seconds.
    expires_at: Option<i64>,
    state: OAuth2State,
}

impl OAuth2 {
    pub fn new(endpoints: OAuth2Endpoints) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }

    pub fn state(&self) -> OAuth2State {
        self.state
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(|t| DateTime::from_timestamp(t, 0))
    }

    /// Override the recorded expiry, e.g. when restoring a persisted token.
    pub fn set_expires_at(&mut self, at: Option<DateTime<Utc>>) {
        self.expires_at = at.map(|t| t.timestamp());
    }

    fn needs_refresh(&self, now: i64) -> bool {
        match self.expires_at {
            None => true,
            Some(at) => at - now < REFRESH_THRESHOLD_SECS,
        }
    }

    /// Trade the refresh token for a new access token.
    pub fn refresh(&mut self, transport: &dyn Transport) -> Result<()> {
        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or_else(|| BuzzError::auth("access token expired and no refresh token available"))?;
        self.token_request(
            transport,
            &[("grant_type", REFRESH_TOKEN), ("refresh_token", &refresh_token)],
            "token refresh",
        )?;
        info!("OAuth2 access token refreshed");
        Ok(())
    }

    /// POST a token-endpoint form (client credentials added) and apply the JSON response.
    fn token_request(
        &mut self,
        transport: &dyn Transport,
        params: &[(&str, &str)],
        context: &str,
    ) -> Result<()> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| BuzzError::auth(format!("{}: no client configured", context)))?;
        let mut form: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .filter(|(k, _)| *k == "code")
            .collect();
        form.push(("client_id", client_id));
        form.push(("client_secret", &self.client_secret));
        form.extend(params.iter().copied().filter(|(k, _)| *k != "code"));

        let mut request = Request::post(self.endpoints.token_url.clone());
        request.header("Content-Type", FORM_CONTENT_TYPE);
        request.add_body(encode_form(&form).into_bytes());
        debug!("OAuth2 {} request to {}", context, request.url);

        let response = transport.send(&request)?;
        if !response.is_success() {
            return Err(BuzzError::auth(format!(
                "{} failed ({}): {}",
                context,
                response.status,
                response.text()
            )));
        }
        let tokens = parse_token_response(&response.body)?;
        self.apply(tokens, now_secs());
        Ok(())
    }

    fn apply(&mut self, tokens: TokenResponse, now: i64) {
        self.access_token = tokens.access_token;
        if let Some(refresh) = tokens.refresh_token {
            self.refresh_token = Some(refresh);
        }
        self.expires_at = Some(now + tokens.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
        self.state = OAuth2State::Authorized;
    }
}

fn parse_token_response(body: &[u8]) -> Result<TokenResponse> {
    let tokens: TokenResponse = serde_json::from_slice(body)
        .map_err(|e| BuzzError::auth(format!("invalid token JSON: {}", e)))?;
    match tokens.access_token.as_deref() {
        Some(t) if !t.is_empty() => Ok(tokens),
        _ => Err(BuzzError::auth("missing access_token in response")),
    }
}

impl Authorizer for OAuth2 {
    fn version(&self) -> OAuthVersion {
        OAuthVersion::V2
    }

    fn set_consumer(&mut self, key: &str, secret: &str, _scope: &str) {
        self.client_id = Some(key.to_string());
        self.client_secret = secret.to_string();
        if self.state == OAuth2State::Unconfigured {
            self.state = OAuth2State::AwaitingCode;
        }
    }

    fn authentication_url(
        &mut self,
        _transport: &dyn Transport,
        scope: &str,
        key: &str,
        secret: &str,
        callback: &str,
    ) -> Result<String> {
        self.set_consumer(key, secret, scope);
        let mut params = BTreeMap::new();
        params.insert("client_id", key);
        params.insert("redirect_uri", callback);
        params.insert("response_type", "code");
        params.insert("scope", scope);
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        Ok(format!("{}?{}", self.endpoints.auth_url, query))
    }

    fn exchange_for_access_token(
        &mut self,
        transport: &dyn Transport,
        code: &str,
        redirect_uri: &str,
    ) -> Result<()> {
        self.token_request(
            transport,
            &[
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", AUTHORIZATION_CODE),
            ],
            "token exchange",
        )?;
        info!("OAuth2 access token obtained");
        Ok(())
    }

    fn set_token_with_secret(&mut self, token: &str, secret: &str) {
        self.access_token = Some(token.to_string()).filter(|t| !t.is_empty());
        self.refresh_token = Some(secret.to_string()).filter(|s| !s.is_empty());
        self.expires_at = None;
        if self.access_token.is_some() {
            self.state = OAuth2State::Authorized;
        }
    }

    fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn token_secret(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    fn sign(&mut self, transport: &dyn Transport, request: &mut Request) -> Result<()> {
        if self.needs_refresh(now_secs()) {
            self.refresh(transport)?;
        }
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| BuzzError::auth("not authorized: no access token"))?;
        request.header("Authorization", format!("OAuth {}", token));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::oauth::parse_form;
    use chrono::Duration;

    const TOKEN_JSON: &str =
        r#"{"access_token":"ya29.new","token_type":"Bearer","expires_in":3600,"refresh_token":"1//0abc"}"#;

    fn authorized(expires_in: i64) -> OAuth2 {
        let mut o = OAuth2::default();
        o.set_consumer("client", "secret", "");
        o.set_token_with_secret("ya29.old", "1//refresh");
        o.set_expires_at(Some(Utc::now() + Duration::seconds(expires_in)));
        o
    }

    #[test]
    fn test_authentication_url_sorted_and_encoded() {
        let transport = MockTransport::new();
        let mut o = OAuth2::default();
        let url = o
            .authentication_url(
                &transport,
                "https://www.googleapis.com/auth/buzz",
                "client.apps",
                "secret",
                "http://localhost:8080/cb",
            )
            .unwrap();
        assert_eq!(
            url,
            "https://accounts.google.com/o/oauth2/auth?client_id=client.apps&redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcb&response_type=code&scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fbuzz"
        );
        assert_eq!(o.state(), OAuth2State::AwaitingCode);
        assert_eq!(transport.sent(), 0);
    }

    #[test]
    fn test_parse_token_response() {
        let t = parse_token_response(TOKEN_JSON.as_bytes()).unwrap();
        assert_eq!(t.access_token.as_deref(), Some("ya29.new"));
        assert_eq!(t.refresh_token.as_deref(), Some("1//0abc"));
        assert_eq!(t.expires_in, Some(3600));
        assert!(parse_token_response(br#"{"error":"invalid_grant"}"#).is_err());
        assert!(parse_token_response(b"not json").is_err());
    }

    #[test]
    fn test_exchange_posts_form_and_stores_tokens() {
        let transport = MockTransport::new().respond(200, TOKEN_JSON);
        let mut o = OAuth2::default();
        o.set_consumer("client", "s3cret", "scope");
        o.exchange_for_access_token(&transport, "4/code", "urn:ietf:wg:oauth:2.0:oob")
            .unwrap();

        let req = transport.last();
        assert_eq!(req.url, "https://accounts.google.com/o/oauth2/token");
        assert_eq!(req.header_value("Content-Type"), Some(FORM_CONTENT_TYPE));
        let body = String::from_utf8(req.body.clone().unwrap()).unwrap();
        let form = parse_form(&body);
        let keys: Vec<&str> = form.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["code", "client_id", "client_secret", "redirect_uri", "grant_type"]);
        assert_eq!(form[0].1, "4/code");
        assert_eq!(form[4].1, "authorization_code");

        assert_eq!(o.token(), Some("ya29.new"));
        assert_eq!(o.token_secret(), Some("1//0abc"));
        assert_eq!(o.state(), OAuth2State::Authorized);
        let left = o.expires_at().unwrap() - Utc::now();
        assert!(left > Duration::seconds(3500) && left <= Duration::seconds(3600));
    }

    #[test]
    fn test_sign_refreshes_near_expiry() {
        let transport = MockTransport::new().respond(200, r#"{"access_token":"ya29.new","expires_in":3600}"#);
        let mut o = authorized(100);
        let mut req = Request::get("https://www.googleapis.com/buzz/v1/activities/@me/@self");
        o.sign(&transport, &mut req).unwrap();

        assert_eq!(transport.sent(), 1);
        let refresh = transport.last();
        let form = parse_form(&String::from_utf8(refresh.body.unwrap()).unwrap());
        assert!(form.contains(&("grant_type".to_string(), "refresh_token".to_string())));
        assert!(form.contains(&("refresh_token".to_string(), "1//refresh".to_string())));
        assert_eq!(req.header_value("Authorization"), Some("OAuth ya29.new"));
        // Refresh token is kept when the response omits it.
        assert_eq!(o.refresh_token(), Some("1//refresh"));
    }

    #[test]
    fn test_sign_uses_current_token_when_fresh() {
        let transport = MockTransport::new();
        let mut o = authorized(400);
        let mut req = Request::get("https://www.googleapis.com/buzz/v1/people/@me/@self");
        o.sign(&transport, &mut req).unwrap();
        assert_eq!(transport.sent(), 0);
        assert_eq!(req.header_value("Authorization"), Some("OAuth ya29.old"));
    }

    #[test]
    fn test_unknown_expiry_without_refresh_token_fails() {
        let transport = MockTransport::new();
        let mut o = OAuth2::default();
        o.set_consumer("client", "secret", "");
        o.set_token_with_secret("ya29.old", "");
        let mut req = Request::get("https://example.com/");
        assert!(matches!(o.sign(&transport, &mut req), Err(BuzzError::Auth(_))));
        assert_eq!(req.header_value("Authorization"), None);
    }

    #[test]
    fn test_refresh_failure_is_auth_error() {
        let transport = MockTransport::new().respond(400, r#"{"error":"invalid_grant"}"#);
        let mut o = authorized(10);
        let mut req = Request::get("https://example.com/");
        match o.sign(&transport, &mut req) {
            Err(BuzzError::Auth(msg)) => assert!(msg.contains("invalid_grant")),
            other => panic!("unexpected {:?}", other),
        }
    }
}

/*
 * oauth1.rs
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

//! OAuth 1.0a with HMAC-SHA1 signatures.
//!
//! 1. `authentication_url`: signed POST to the request-token endpoint (with
//!    `oauth_callback`), then build the authorize URL around the request token.
//! 2. `exchange_for_access_token`: signed POST to the access-token endpoint with
//!    `oauth_verifier`; the returned token pair replaces the request token.
//! 3. `sign`: `Authorization: OAuth ...` over method, base URL and every query,
//!    form-body and protocol parameter.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use log::{debug, info};
use sha1::Sha1;

use crate::config::OAuth1Endpoints;
use crate::error::{BuzzError, Result};
use crate::http::{Request, Transport};

use super::{now_secs, parse_form, percent_encode, Authorizer, OAuthVersion};

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default)]
pub struct OAuth1 {
    endpoints: OAuth1Endpoints,
    consumer_key: Option<String>,
    consumer_secret: String,
    scope: Option<String>,
    token: Option<String>,
    token_secret: Option<String>,
}

impl OAuth1 {
    pub fn new(endpoints: OAuth1Endpoints) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }

    fn scoped(url: &str, scope: Option<&str>) -> String {
        match scope {
            Some(scope) => format!("{}?scope={}", url, percent_encode(scope)),
            None => url.to_string(),
        }
    }

    fn consumer_key(&self) -> Result<&str> {
        self.consumer_key
            .as_deref()
            .ok_or_else(|| BuzzError::auth("no consumer configured"))
    }

    /// `Authorization` header value for `request` with the given nonce and timestamp.
    /// `extra` carries step-specific protocol parameters (`oauth_callback`, `oauth_verifier`).
    fn authorization_header(
        &self,
        request: &Request,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<String> {
        let timestamp = timestamp.to_string();
        let mut protocol: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", self.consumer_key()?),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", &timestamp),
        ];
        if let Some(token) = self.token.as_deref() {
            protocol.push(("oauth_token", token));
        }
        protocol.push(("oauth_version", OAUTH_VERSION));
        protocol.extend_from_slice(extra);

        let mut params: Vec<(String, String)> = protocol
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(query) = request.query() {
            params.extend(parse_form(query));
        }
        if request.has_form_body() {
            if let Some(body) = request.body.as_deref() {
                params.extend(parse_form(&String::from_utf8_lossy(body)));
            }
        }

        let base = signature_base_string(request.method.as_str(), request.base_url(), &params);
        let signature = hmac_sha1_signature(
            &base,
            &self.consumer_secret,
            self.token_secret.as_deref().unwrap_or(""),
        )?;
        protocol.push(("oauth_signature", &signature));

        let fields: Vec<String> = protocol
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn sign_with(&self, request: &mut Request, extra: &[(&str, &str)]) -> Result<()> {
        let header = self.authorization_header(request, extra, &generate_nonce()?, now_secs())?;
        request.header("Authorization", header);
        Ok(())
    }

    /// Signed POST to a token endpoint; returns `(oauth_token, oauth_token_secret)`.
    fn fetch_token(
        &self,
        transport: &dyn Transport,
        url: &str,
        extra: &[(&str, &str)],
        step: &str,
    ) -> Result<(String, String)> {
        let mut request = Request::post(url);
        request.header("Content-Length", "0");
        self.sign_with(&mut request, extra)?;
        debug!("OAuth1 {} request to {}", step, request.base_url());
        let response = transport.send(&request)?;
        if !response.is_success() {
            return Err(BuzzError::auth(format!(
                "{} failed ({}): {}",
                step,
                response.status,
                response.text()
            )));
        }
        let pairs = parse_form(response.text().trim());
        let find = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };
        let token = find("oauth_token")
            .ok_or_else(|| BuzzError::auth(format!("{}: missing oauth_token in response", step)))?;
        let secret = find("oauth_token_secret").ok_or_else(|| {
            BuzzError::auth(format!("{}: missing oauth_token_secret in response", step))
        })?;
        Ok((token, secret))
    }
}

impl Authorizer for OAuth1 {
    fn version(&self) -> OAuthVersion {
        OAuthVersion::V1
    }

    fn set_consumer(&mut self, key: &str, secret: &str, scope: &str) {
        // Tokens are bound to the consumer that obtained them.
        if self.consumer_key.as_deref().is_some_and(|current| current != key) {
            self.token = None;
            self.token_secret = None;
        }
        self.consumer_key = Some(key.to_string());
        self.consumer_secret = secret.to_string();
        self.scope = Some(scope.to_string()).filter(|s| !s.is_empty());
    }

    fn authentication_url(
        &mut self,
        transport: &dyn Transport,
        scope: &str,
        key: &str,
        secret: &str,
        callback: &str,
    ) -> Result<String> {
        self.set_consumer(key, secret, scope);
        // A fresh handshake never carries an old token.
        self.token = None;
        self.token_secret = None;
        let url = Self::scoped(&self.endpoints.request_token_url, self.scope.as_deref());
        let (token, token_secret) =
            self.fetch_token(transport, &url, &[("oauth_callback", callback)], "request token")?;

        let authorize = Self::scoped(&self.endpoints.authorize_url, self.scope.as_deref());
        let separator = if authorize.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}domain={}&oauth_token={}",
            authorize,
            separator,
            percent_encode(key),
            percent_encode(&token)
        );
        self.token = Some(token);
        self.token_secret = Some(token_secret);
        Ok(url)
    }

    fn exchange_for_access_token(
        &mut self,
        transport: &dyn Transport,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<()> {
        if self.token.is_none() {
            return Err(BuzzError::auth("no request token; fetch the authentication URL first"));
        }
        let url = self.endpoints.access_token_url.clone();
        let (token, secret) =
            self.fetch_token(transport, &url, &[("oauth_verifier", code)], "access token")?;
        info!("OAuth1 access token obtained");
        self.token = Some(token);
        self.token_secret = Some(secret);
        Ok(())
    }

    fn set_token_with_secret(&mut self, token: &str, secret: &str) {
        self.token = Some(token.to_string()).filter(|t| !t.is_empty());
        self.token_secret = Some(secret.to_string());
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn token_secret(&self) -> Option<&str> {
        self.token_secret.as_deref()
    }

    fn sign(&mut self, _transport: &dyn Transport, request: &mut Request) -> Result<()> {
        self.sign_with(request, &[])
    }
}

/// `METHOD&enc(base_url)&enc(normalized params)`; params are encoded, then sorted by name and value.
fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&normalize_url(base_url)),
        percent_encode(&normalized)
    )
}

/// Lower-case scheme and host; drop the default port.
fn normalize_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let scheme = scheme.to_ascii_lowercase();
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    let mut authority = authority.to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => ":80",
        "https" => ":443",
        _ => "",
    };
    if !default_port.is_empty() && authority.ends_with(default_port) {
        authority.truncate(authority.len() - default_port.len());
    }
    format!("{}://{}{}", scheme, authority, path)
}

fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| BuzzError::auth(format!("HMAC key: {}", e)))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// 16 random bytes, hex-encoded.
fn generate_nonce() -> Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| BuzzError::auth(format!("nonce: {}", e)))?;
    Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::http::Method;

    fn photos_consumer() -> OAuth1 {
        let mut o = OAuth1::default();
        o.set_consumer("dpf43f3p2l4k3l03", "kd94hf93k423kf44", "");
        o.set_token_with_secret("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        o
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        let mut mac = Hmac::<Sha1>::new_from_slice(b"key").unwrap();
        mac.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(STANDARD.encode(mac.finalize().into_bytes()), "3nybhbi3iqa8ino29wqQcBydtNk=");
    }

    #[test]
    fn test_signature_base_string_matches_reference() {
        let params: Vec<(String, String)> = [
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_token", "nnch734d00sl2jdk"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1191242096"),
            ("oauth_nonce", "kllo9940pd9333jh"),
            ("oauth_version", "1.0"),
            ("file", "vacation.jpg"),
            ("size", "original"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let base = signature_base_string("GET", "http://photos.example.net/photos", &params);
        assert_eq!(
            base,
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );
        let sig = hmac_sha1_signature(&base, "kd94hf93k423kf44", "pfkkdhi9sl3r4s00").unwrap();
        assert_eq!(sig, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_authorization_header_reproduces_reference_signature() {
        let o = photos_consumer();
        let request = Request::new(
            Method::Get,
            "http://photos.example.net/photos?file=vacation.jpg&size=original",
        );
        let header = o
            .authorization_header(&request, &[], "kllo9940pd9333jh", 1_191_242_096)
            .unwrap();
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_token=\"nnch734d00sl2jdk\""));
        assert!(header.contains("oauth_signature=\"tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D\""));
    }

    #[test]
    fn test_sign_get_with_fixed_token() {
        let transport = MockTransport::new();
        let mut o = OAuth1::default();
        o.set_consumer("K", "S", "");
        o.set_token_with_secret("T", "TS");
        let mut req = Request::get("https://www.googleapis.com/buzz/v1/activities/@me/@self");
        o.sign(&transport, &mut req).unwrap();
        let header = req.header_value("Authorization").unwrap();
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_consumer_key=\"K\""));
        assert!(header.contains("oauth_token=\"T\""));
        assert_eq!(transport.sent(), 0);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("HTTP://Example.COM:80/r%20v/X"), "http://example.com/r%20v/X");
        assert_eq!(normalize_url("https://www.example.net:8080/"), "https://www.example.net:8080/");
        assert_eq!(normalize_url("https://example.com:443"), "https://example.com/");
    }

    #[test]
    fn test_form_body_takes_part_in_signature() {
        let o = photos_consumer();
        let mut a = Request::post("http://example.com/p");
        a.header("Content-Type", "application/x-www-form-urlencoded").body(b"x=1".to_vec());
        let mut b = Request::post("http://example.com/p");
        b.header("Content-Type", "application/x-www-form-urlencoded").body(b"x=2".to_vec());
        let ha = o.authorization_header(&a, &[], "n", 1).unwrap();
        let hb = o.authorization_header(&b, &[], "n", 1).unwrap();
        assert_ne!(ha, hb);

        // Atom bodies are not parameters.
        let mut c = Request::post("http://example.com/p");
        c.add_body(b"<entry/>".to_vec());
        let mut d = Request::post("http://example.com/p");
        d.add_body(b"<entry></entry>".to_vec());
        assert_eq!(
            o.authorization_header(&c, &[], "n", 1).unwrap().split("oauth_signature=").nth(1),
            o.authorization_header(&d, &[], "n", 1).unwrap().split("oauth_signature=").nth(1)
        );
    }

    #[test]
    fn test_handshake() {
        let transport = MockTransport::new()
            .respond(200, "oauth_token=req%2F1&oauth_token_secret=rsec&oauth_callback_confirmed=true")
            .respond(200, "oauth_token=acc&oauth_token_secret=asec");
        let mut o = OAuth1::default();
        let url = o
            .authentication_url(&transport, "https://www.googleapis.com/auth/buzz", "anonymous", "anonymous", "oob")
            .unwrap();
        assert_eq!(
            url,
            "https://www.google.com/buzz/api/auth/OAuthAuthorizeToken?scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fbuzz&domain=anonymous&oauth_token=req%2F1"
        );
        let first = transport.last();
        assert_eq!(first.method, Method::Post);
        assert_eq!(
            first.url,
            "https://www.google.com/accounts/OAuthGetRequestToken?scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fbuzz"
        );
        let auth = first.header_value("Authorization").unwrap();
        assert!(auth.contains("oauth_callback=\"oob\""));
        assert!(!auth.contains("oauth_token="));
        assert_eq!(o.token(), Some("req/1"));

        o.exchange_for_access_token(&transport, "verifier-123", "").unwrap();
        let second = transport.last();
        assert_eq!(second.url, "https://www.google.com/accounts/OAuthGetAccessToken");
        let auth = second.header_value("Authorization").unwrap();
        assert!(auth.contains("oauth_verifier=\"verifier-123\""));
        assert!(auth.contains("oauth_token=\"req%2F1\""));
        assert_eq!(o.token(), Some("acc"));
        assert_eq!(o.token_secret(), Some("asec"));
    }

    #[test]
    fn test_request_token_failure_is_auth_error() {
        let transport = MockTransport::new().respond(400, "signature_invalid");
        let mut o = OAuth1::default();
        let err = o
            .authentication_url(&transport, "s", "k", "s", "oob")
            .unwrap_err();
        match err {
            BuzzError::Auth(msg) => assert!(msg.contains("signature_invalid")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exchange_without_request_token() {
        let transport = MockTransport::new();
        let mut o = OAuth1::default();
        o.set_consumer("k", "s", "scope");
        assert!(matches!(
            o.exchange_for_access_token(&transport, "v", ""),
            Err(BuzzError::Auth(_))
        ));
        assert_eq!(transport.sent(), 0);
    }

    #[test]
    fn test_changing_consumer_discards_token() {
        let mut o = OAuth1::default();
        o.set_token_with_secret("T", "TS");
        o.set_consumer("K", "S", "");
        assert_eq!(o.token(), Some("T"));

        o.set_consumer("K", "S2", "scope");
        assert_eq!(o.token(), Some("T"));
        assert_eq!(o.token_secret(), Some("TS"));

        o.set_consumer("other", "S", "");
        assert_eq!(o.token(), None);
        assert_eq!(o.token_secret(), None);
    }

    #[test]
    fn test_sign_without_consumer_fails() {
        let transport = MockTransport::new();
        let mut o = OAuth1::default();
        let mut req = Request::get("https://example.com/");
        assert!(matches!(o.sign(&transport, &mut req), Err(BuzzError::Auth(_))));
    }
}

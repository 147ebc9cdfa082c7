/*
 * client.rs
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

//! `Buzz`: one call per API operation.
//!
//! Each operation builds the URL (and Atom body for writes), has the authorizer
//! sign the request, sends it through the transport, maps non-2xx responses to
//! [`BuzzError::Transport`] and decodes the body with the matching parser.

use std::path::Path;

use log::debug;

use crate::config::{self, ClientConfig};
use crate::error::Result;
use crate::http::{Request, Response, Transport};
use crate::model::{Comment, CommentsFeed, Content, Feed, FeedEntry, FeedType, Link, UserProfile};
use crate::oauth::{Authorizer, OAuth1, OAuth2, OUT_OF_BAND_CALLBACK};
use crate::parser;
use crate::payload::construct_payload;

const SELF: &str = FeedType::Private.as_str();
const GROUPS: &str = "@groups";

pub struct Buzz<T: Transport> {
    transport: T,
    authorizer: Box<dyn Authorizer>,
    config: ClientConfig,
}

impl<T: Transport> Buzz<T> {
    pub fn new(transport: T, authorizer: Box<dyn Authorizer>) -> Self {
        Self::with_config(transport, authorizer, ClientConfig::default())
    }

    pub fn with_config(transport: T, authorizer: Box<dyn Authorizer>, config: ClientConfig) -> Self {
        Self {
            transport,
            authorizer,
            config,
        }
    }

    /// Client using OAuth 1.0a against the configured endpoints.
    pub fn oauth1(transport: T, config: ClientConfig) -> Self {
        let authorizer = Box::new(OAuth1::new(config.oauth1.clone()));
        Self::with_config(transport, authorizer, config)
    }

    /// Client using OAuth 2.0 against the configured endpoints.
    pub fn oauth2(transport: T, config: ClientConfig) -> Self {
        let authorizer = Box::new(OAuth2::new(config.oauth2.clone()));
        Self::with_config(transport, authorizer, config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Authorization ─────────────────────────────────────────────────

    /// URL the user visits to grant access. `callback` defaults to `oob`.
    pub fn authentication_url(
        &mut self,
        scope: &str,
        key: &str,
        secret: &str,
        callback: Option<&str>,
    ) -> Result<String> {
        let callback = callback.unwrap_or(OUT_OF_BAND_CALLBACK);
        self.authorizer
            .authentication_url(&self.transport, scope, key, secret, callback)
    }

    pub fn set_consumer(&mut self, key: &str, secret: &str, scope: &str) {
        self.authorizer.set_consumer(key, secret, scope);
    }

    pub fn exchange_for_access_token(&mut self, code: &str, redirect_uri: &str) -> Result<()> {
        self.authorizer
            .exchange_for_access_token(&self.transport, code, redirect_uri)
    }

    pub fn set_token_with_secret(&mut self, token: &str, secret: &str) {
        self.authorizer.set_token_with_secret(token, secret);
    }

    /// Persist the current token pair under `key` in the credentials file at `path`.
    pub fn save_token(&self, path: &Path, key: &str) -> Result<()> {
        let token = self.authorizer.token().unwrap_or("");
        let secret = self.authorizer.token_secret().unwrap_or("");
        config::save_credential(path, key, token, secret)
    }

    /// Install the token pair stored under `key`. Returns false when none is stored.
    pub fn load_token(&mut self, path: &Path, key: &str) -> Result<bool> {
        let credentials = config::load_credentials(path)?;
        match credentials.get(key) {
            Some(entry) => {
                self.authorizer.set_token_with_secret(&entry.token, &entry.secret);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Activities ────────────────────────────────────────────────────

    /// Activity feed of `user`. `@public` feeds are fetched unsigned.
    pub fn get_posts(&mut self, user: &str, feed_type: FeedType) -> Result<Feed> {
        let request = Request::get(self.activities(&[user, feed_type.as_str()]));
        let response = self.execute(request, feed_type.requires_auth())?;
        parser::parse_feed(&response.body)
    }

    pub fn get_post(&mut self, user: &str, activity: &str) -> Result<FeedEntry> {
        let request = Request::get(self.activities(&[user, SELF, activity]));
        let response = self.execute(request, true)?;
        parser::parse_feed_entry(&response.body)
    }

    pub fn create_post(&mut self, user: &str, content: &Content, link: Option<&Link>) -> Result<FeedEntry> {
        let request = with_payload(Request::post(self.activities(&[user, SELF])), content, link)?;
        let response = self.execute(request, true)?;
        parser::parse_feed_entry(&response.body)
    }

    pub fn update_post(&mut self, user: &str, activity: &str, content: &Content) -> Result<FeedEntry> {
        let request = with_payload(Request::put(self.activities(&[user, SELF, activity])), content, None)?;
        let response = self.execute(request, true)?;
        parser::parse_feed_entry(&response.body)
    }

    pub fn delete_post(&mut self, user: &str, activity: &str) -> Result<()> {
        let request = Request::delete(self.activities(&[user, SELF, activity]));
        self.execute(request, true)?;
        Ok(())
    }

    // ── Comments ──────────────────────────────────────────────────────

    pub fn create_comment(&mut self, user: &str, activity: &str, content: &Content) -> Result<Comment> {
        let url = self.activities(&[user, SELF, activity, FeedType::Comments.as_str()]);
        let request = with_payload(Request::post(url), content, None)?;
        let response = self.execute(request, true)?;
        parser::parse_comment(&response.body)
    }

    pub fn get_comment(&mut self, user: &str, activity: &str, comment: &str) -> Result<Comment> {
        let url = self.activities(&[user, SELF, activity, FeedType::Comments.as_str(), comment]);
        let response = self.execute(Request::get(url), true)?;
        parser::parse_comment(&response.body)
    }

    pub fn get_comments(&mut self, user: &str, activity: &str) -> Result<CommentsFeed> {
        let url = self.activities(&[user, SELF, activity, FeedType::Comments.as_str()]);
        let response = self.execute(Request::get(url), true)?;
        parser::parse_comments_feed(&response.body)
    }

    pub fn update_comment(
        &mut self,
        user: &str,
        activity: &str,
        comment: &str,
        content: &Content,
    ) -> Result<Comment> {
        let url = self.activities(&[user, SELF, activity, FeedType::Comments.as_str(), comment]);
        let request = with_payload(Request::put(url), content, None)?;
        let response = self.execute(request, true)?;
        parser::parse_comment(&response.body)
    }

    pub fn delete_comment(&mut self, user: &str, activity: &str, comment: &str) -> Result<()> {
        let url = self.activities(&[user, SELF, activity, FeedType::Comments.as_str(), comment]);
        self.execute(Request::delete(url), true)?;
        Ok(())
    }

    // ── People ────────────────────────────────────────────────────────

    pub fn get_user_profile(&mut self, user: &str) -> Result<UserProfile> {
        let response = self.execute(Request::get(self.people(&[user, SELF])), true)?;
        parser::parse_user_profile(&response.body)
    }

    pub fn followers(&mut self, user: &str) -> Result<Vec<UserProfile>> {
        let url = self.people(&[user, GROUPS, FeedType::Followers.as_str()]);
        let response = self.execute(Request::get(url), true)?;
        parser::parse_users_profiles(&response.body)
    }

    pub fn following(&mut self, user: &str) -> Result<Vec<UserProfile>> {
        let url = self.people(&[user, GROUPS, FeedType::Following.as_str()]);
        let response = self.execute(Request::get(url), true)?;
        parser::parse_users_profiles(&response.body)
    }

    pub fn follow(&mut self, user: &str, other: &str) -> Result<()> {
        let mut request = Request::put(self.people(&[user, GROUPS, FeedType::Following.as_str(), other]));
        request.header("Content-Length", "0");
        self.execute(request, true)?;
        Ok(())
    }

    pub fn unfollow(&mut self, user: &str, other: &str) -> Result<()> {
        let url = self.people(&[user, GROUPS, FeedType::Following.as_str(), other]);
        self.execute(Request::delete(url), true)?;
        Ok(())
    }

    // ── Plumbing ──────────────────────────────────────────────────────

    fn activities(&self, segments: &[&str]) -> String {
        join_url(&self.config.activities_url, segments)
    }

    fn people(&self, segments: &[&str]) -> String {
        join_url(&self.config.people_url, segments)
    }

    fn execute(&mut self, mut request: Request, signed: bool) -> Result<Response> {
        if signed {
            self.authorizer.sign(&self.transport, &mut request)?;
        }
        debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.send(&request)?;
        debug!("{} {} -> {} ({} bytes)", request.method.as_str(), request.url, response.status, response.body.len());
        response.error_for_status()
    }
}

fn with_payload(mut request: Request, content: &Content, link: Option<&Link>) -> Result<Request> {
    let body = construct_payload(content, link)?;
    request.add_body(body);
    Ok(request)
}

fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuzzError;
    use crate::http::mock::MockTransport;
    use crate::http::Method;

    fn client(transport: MockTransport) -> Buzz<MockTransport> {
        let mut buzz = Buzz::oauth1(transport, ClientConfig::default());
        buzz.set_consumer("anonymous", "anonymous", "https://www.googleapis.com/auth/buzz");
        buzz.set_token_with_secret("tok", "sec");
        buzz
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://h/a/", &["u", "@self"]), "https://h/a/u/@self");
        assert_eq!(join_url("https://h/a", &[]), "https://h/a");
    }

    #[test]
    fn test_public_feed_is_unsigned() {
        let mut buzz = client(MockTransport::new().respond(200, "<feed><id>f</id></feed>"));
        let feed = buzz.get_posts("117", FeedType::Public).unwrap();
        assert_eq!(feed.id.as_deref(), Some("f"));
        let req = buzz.transport().last();
        assert_eq!(req.url, "https://www.googleapis.com/buzz/v1/activities/117/@public");
        assert_eq!(req.header_value("Authorization"), None);
    }

    #[test]
    fn test_private_feed_is_signed() {
        let mut buzz = client(MockTransport::new().respond(200, "<feed/>"));
        buzz.get_posts("@me", FeedType::Consumption).unwrap();
        let req = buzz.transport().last();
        assert_eq!(req.url, "https://www.googleapis.com/buzz/v1/activities/@me/@consumption");
        assert!(req.header_value("Authorization").unwrap().starts_with("OAuth "));
    }

    #[test]
    fn test_create_post_sends_atom_body() {
        let mut buzz = client(MockTransport::new().respond(201, "<entry><id>new</id></entry>"));
        let entry = buzz.create_post("@me", &Content::new("hi", "text"), None).unwrap();
        assert_eq!(entry.id.as_deref(), Some("new"));
        let req = buzz.transport().last();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "https://www.googleapis.com/buzz/v1/activities/@me/@self");
        assert_eq!(req.header_value("Content-Type"), Some("application/atom+xml"));
        let body = req.body.clone().unwrap();
        assert_eq!(req.header_value("Content-Length"), Some(body.len().to_string().as_str()));
    }

    #[test]
    fn test_invalid_content_sends_nothing() {
        let mut buzz = client(MockTransport::new());
        let err = buzz.create_post("@me", &Content::default(), None).unwrap_err();
        assert!(matches!(err, BuzzError::Validation(_)));
        assert_eq!(buzz.transport().sent(), 0);
    }

    #[test]
    fn test_follow_is_empty_put() {
        let mut buzz = client(MockTransport::new().respond(204, ""));
        buzz.follow("@me", "42").unwrap();
        let req = buzz.transport().last();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.url, "https://www.googleapis.com/buzz/v1/people/@me/@groups/@following/42");
        assert_eq!(req.header_value("Content-Length"), Some("0"));
        assert_eq!(req.body, None);
    }

    #[test]
    fn test_error_status_carries_body() {
        let mut buzz = client(MockTransport::new().respond(404, "<errors><error/></errors>"));
        let err = buzz.get_post("@me", "missing").unwrap_err();
        match &err {
            BuzzError::Transport { status, .. } => assert_eq!(*status, Some(404)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.error_body(), Some("<errors><error/></errors>"));
    }
}

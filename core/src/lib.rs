/*
 * lib.rs
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

//! Client library for the Buzz activity API.
//!
//! Requests are authorized with OAuth 1.0a or OAuth 2.0 ([`oauth`]), sent through
//! an application-supplied [`http::Transport`], and the Atom responses are decoded
//! by a streaming handler stack ([`parser`]) into the types in [`model`].
//! [`Buzz`] ties these together with one method per API operation.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod oauth;
pub mod parser;
pub mod payload;

pub use client::Buzz;
pub use config::ClientConfig;
pub use error::{BuzzError, Result};
pub use http::{Method, Request, Response, Transport};
pub use model::{
    AclEntry, Activity, Author, Comment, CommentsFeed, Content, Email, Feed, FeedEntry, FeedType,
    Link, Photo, Reply, Url, UserProfile,
};
pub use oauth::{Authorizer, OAuth1, OAuth2, OAuth2State, OAuthVersion, READONLY_SCOPE, WRITE_SCOPE};

/*
 * feed.rs
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

//! Activity feeds and their entries.

use chrono::{DateTime, Utc};

/// Feed selector appended to the activities or people URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    /// `@public`: readable without authentication.
    Public,
    /// `@self`: the user's own activities (also used for single-post URLs).
    Private,
    /// `@consumption`: activities from people the user follows.
    Consumption,
    Comments,
    Followers,
    Following,
}

impl FeedType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FeedType::Public => "@public",
            FeedType::Private => "@self",
            FeedType::Consumption => "@consumption",
            FeedType::Comments => "@comments",
            FeedType::Followers => "@followers",
            FeedType::Following => "@following",
        }
    }

    /// Only the public feed may be fetched without signing.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, FeedType::Public)
    }
}

/// `<link>`: all fields come from attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub href: Option<String>,
    pub rel: Option<String>,
    pub media_type: Option<String>,
    /// `buzz:count`; absent attribute is `None`, never zero.
    pub count: Option<i32>,
}

/// `<thr:in-reply-to>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub href: Option<String>,
    pub reference: Option<String>,
    pub media_type: Option<String>,
}

/// `<content>` (or `<buzz:original-content>`): text body plus its `type` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub text: Option<String>,
    pub media_type: Option<String>,
}

impl Content {
    pub fn new(text: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            media_type: Some(media_type.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// `poco:id`
    pub id: Option<String>,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub activity_object_type: Option<String>,
    pub links: Vec<Link>,
}

/// `<activity:object>`: the object an entry's verb applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    pub activity_object_type: Option<String>,
    pub content: Option<Content>,
    pub link: Option<Link>,
}

/// One `<buzz:aclentry>` inside `<buzz:visibility>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclEntry {
    pub kind: Option<String>,
    pub id: Option<String>,
    pub uri: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub activity_verb: Option<String>,
    pub crosspost_source_id: Option<String>,
    pub source_activity_title: Option<String>,
    pub author: Option<Author>,
    pub content: Option<Content>,
    pub activity: Option<Activity>,
    pub visibility: Vec<AclEntry>,
    pub reply: Option<Reply>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub title_type: Option<String>,
    pub updated: Option<DateTime<Utc>>,
    pub generator: Option<String>,
    pub generator_uri: Option<String>,
    pub links: Vec<Link>,
    pub entries: Vec<FeedEntry>,
}

impl Feed {
    /// First link with the given `rel`, e.g. `"next"` for pagination.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel.as_deref() == Some(rel))
    }
}

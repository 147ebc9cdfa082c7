/*
 * comment.rs
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

//! Comments on an activity.

use chrono::{DateTime, Utc};

use super::{Author, Content, Link, Reply};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    pub id: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub activity_object_type: Option<String>,
    pub author: Option<Author>,
    pub content: Option<Content>,
    /// `buzz:original-content`: the text as the commenter wrote it, before rendering.
    pub original_content: Option<Content>,
    pub reply: Option<Reply>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentsFeed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub title_type: Option<String>,
    pub generator: Option<String>,
    pub generator_uri: Option<String>,
    pub links: Vec<Link>,
    pub comments: Vec<Comment>,
}

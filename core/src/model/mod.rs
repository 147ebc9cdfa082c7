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

//! Plain data records decoded from (or encoded into) Atom activity documents.
//!
//! Relationships are ownership by containment: a feed owns its entries, an entry
//! owns its author, and so on. Every list starts empty.

mod comment;
mod feed;
mod profile;

pub use comment::{Comment, CommentsFeed};
pub use feed::{AclEntry, Activity, Author, Content, Feed, FeedEntry, FeedType, Link, Reply};
pub use profile::{Email, Photo, Url, UserProfile};

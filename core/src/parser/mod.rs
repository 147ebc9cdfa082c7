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

//! Streaming decoder for Buzz Atom responses.
//!
//! Each entry point runs quick-xml over the raw response bytes and feeds the
//! events to a [`HandlerStack`] rooted at the handler for the expected document.
//! No tree is built; values are assembled by the handlers as their subtrees close.

mod comment;
mod date;
mod entity;
mod feed;
mod handler;
mod profile;
mod stack;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{BuzzError, Result};
use crate::model::{Comment, CommentsFeed, Feed, FeedEntry, UserProfile};

pub use date::parse_date;
pub use handler::{Attributes, ElementHandler, Handler, Parsed, Tag};
pub use stack::HandlerStack;

/// Decode an activity feed (`<feed>` of `<entry>`).
pub fn parse_feed(xml: &[u8]) -> Result<Feed> {
    match drive(xml, Handler::feed())? {
        Parsed::Feed(feed) => Ok(feed),
        other => Err(unexpected("feed", &other)),
    }
}

/// Decode a single activity `<entry>`.
pub fn parse_feed_entry(xml: &[u8]) -> Result<FeedEntry> {
    match drive(xml, Handler::feed_entry())? {
        Parsed::FeedEntry(entry) => Ok(entry),
        other => Err(unexpected("feed entry", &other)),
    }
}

/// Decode a single comment `<entry>`.
pub fn parse_comment(xml: &[u8]) -> Result<Comment> {
    match drive(xml, Handler::comment())? {
        Parsed::Comment(comment) => Ok(comment),
        other => Err(unexpected("comment", &other)),
    }
}

/// Decode the comments `<feed>` of one activity.
pub fn parse_comments_feed(xml: &[u8]) -> Result<CommentsFeed> {
    match drive(xml, Handler::comments_feed())? {
        Parsed::CommentsFeed(feed) => Ok(feed),
        other => Err(unexpected("comments feed", &other)),
    }
}

/// Decode one Portable Contacts profile `<entry>`.
pub fn parse_user_profile(xml: &[u8]) -> Result<UserProfile> {
    match drive(xml, Handler::user_profile())? {
        Parsed::UserProfile(profile) => Ok(profile),
        other => Err(unexpected("user profile", &other)),
    }
}

/// Decode a `<feed>` of profiles (followers, following).
pub fn parse_users_profiles(xml: &[u8]) -> Result<Vec<UserProfile>> {
    match drive(xml, Handler::users_profiles())? {
        Parsed::UsersProfiles(profiles) => Ok(profiles),
        other => Err(unexpected("user profile list", &other)),
    }
}

fn unexpected(wanted: &str, got: &Parsed) -> BuzzError {
    BuzzError::parsing(format!("expected {}, decoded {}", wanted, got.kind()))
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| BuzzError::parsing(format!("invalid UTF-8: {}", e)))
}

fn attributes(start: &BytesStart<'_>) -> Result<Attributes> {
    let mut out = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| BuzzError::parsing(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?;
        out.push(key, value.into_owned());
    }
    Ok(out)
}

/// Only comments, processing instructions and whitespace may follow the root element.
fn trailing(event: &Event<'_>) -> Result<()> {
    let offending = match event {
        Event::Start(e) | Event::Empty(e) => Some(format!("<{}>", utf8(e.name().as_ref())?)),
        Event::CData(_) => Some("CDATA section".to_string()),
        Event::Text(e) => {
            let text = e.unescape()?;
            if text.trim().is_empty() {
                None
            } else {
                Some(format!("text {:?}", text.trim()))
            }
        }
        _ => None,
    };
    match offending {
        Some(what) => Err(BuzzError::parsing(format!(
            "{} after the root element was closed",
            what
        ))),
        None => Ok(()),
    }
}

/// Run the tokenizer over `xml`, dispatching every event to a stack rooted at `root`.
fn drive(xml: &[u8], root: Handler) -> Result<Parsed> {
    let mut reader = Reader::from_reader(xml);
    let mut stack = HandlerStack::new(root);
    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf)?;
        if stack.is_done() {
            trailing(&event)?;
        }
        match event {
            Event::Start(e) => {
                let attrs = attributes(&e)?;
                let name = e.name();
                stack.start_element(Tag::new(utf8(name.as_ref())?), &attrs);
            }
            Event::Empty(e) => {
                let attrs = attributes(&e)?;
                let name = e.name();
                let tag = Tag::new(utf8(name.as_ref())?);
                stack.start_element(tag, &attrs);
                stack.end_element(tag);
            }
            Event::End(e) => {
                let name = e.name();
                stack.end_element(Tag::new(utf8(name.as_ref())?));
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                stack.characters(&text);
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                stack.characters(utf8(&bytes)?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    let parsed = stack.finish()?;
    debug!("decoded {} from {} bytes", parsed.kind(), xml.len());
    Ok(parsed)
}

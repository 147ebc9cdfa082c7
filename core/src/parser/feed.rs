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

//! Handlers for `<feed>` documents and their `<entry>` elements.

use crate::model::{Feed, FeedEntry};

use super::date::parse_date;
use super::handler::{Attributes, ElementHandler, FieldText, Handler, Parsed, Tag};

const ENTRY: &str = "entry";
const TITLE: &str = "title";
const UPDATED: &str = "updated";
const ID: &str = "id";
const LINK: &str = "link";

// ── FeedEntryHandler ──────────────────────────────────────────────────

/// One activity entry.
///
/// Position flags are independent booleans rather than a single open field:
/// `crosspost_source_id` needs `crosspost:source` and `id` open together, and
/// `source_activity_title` needs `source`, `activity:service` and `title`.
#[derive(Debug, Default)]
pub struct FeedEntryHandler {
    entry: FeedEntry,
    text: String,
    in_title: bool,
    in_published: bool,
    in_updated: bool,
    in_id: bool,
    in_activity_verb: bool,
    in_crosspost_source: bool,
    in_source: bool,
    in_activity_service: bool,
}

impl FeedEntryHandler {
    fn in_text_field(&self) -> bool {
        self.in_title || self.in_published || self.in_updated || self.in_id || self.in_activity_verb
    }

    fn take_text(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.text);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl ElementHandler for FeedEntryHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if tag.is(TITLE) {
            self.in_title = true;
            self.text.clear();
        } else if tag.is("published") {
            self.in_published = true;
            self.text.clear();
        } else if tag.is(UPDATED) {
            self.in_updated = true;
            self.text.clear();
        } else if tag.is(ID) {
            self.in_id = true;
            self.text.clear();
        } else if tag.is(LINK) {
            return Some(Handler::link());
        } else if tag.is("author") {
            return Some(Handler::author());
        } else if tag.is("content") {
            return Some(Handler::content());
        } else if tag.is_qualified("activity:verb") {
            self.in_activity_verb = true;
            self.text.clear();
        } else if tag.is_qualified("crosspost:source") {
            self.in_crosspost_source = true;
        } else if tag.is("source") {
            self.in_source = true;
        } else if tag.is_qualified("activity:service") {
            self.in_activity_service = true;
        } else if tag.is_qualified("buzz:visibility") {
            return Some(Handler::visibility());
        } else if tag.is_qualified("activity:object") {
            return Some(Handler::activity());
        } else if tag.is_qualified("thr:in-reply-to") {
            return Some(Handler::reply());
        }
        None
    }

    fn characters(&mut self, text: &str) {
        if self.in_text_field() {
            self.text.push_str(text);
        }
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        if let Some(child) = child {
            match child {
                Parsed::Link(link) => self.entry.links.push(link),
                Parsed::Author(author) => self.entry.author = Some(author),
                Parsed::Content(content) => self.entry.content = Some(content),
                Parsed::Visibility(acl) => self.entry.visibility = acl,
                Parsed::Activity(activity) => self.entry.activity = Some(activity),
                Parsed::Reply(reply) => self.entry.reply = Some(reply),
                _ => {}
            }
            return;
        }
        if tag.is(TITLE) && self.in_title {
            if let Some(value) = self.take_text() {
                if self.in_source && self.in_activity_service {
                    self.entry.source_activity_title = Some(value);
                } else {
                    self.entry.title = Some(value);
                }
            }
            self.in_title = false;
        } else if tag.is("published") && self.in_published {
            if let Some(value) = self.take_text() {
                self.entry.published = parse_date(&value);
            }
            self.in_published = false;
        } else if tag.is(UPDATED) && self.in_updated {
            if let Some(value) = self.take_text() {
                self.entry.updated = parse_date(&value);
            }
            self.in_updated = false;
        } else if tag.is(ID) && self.in_id {
            if let Some(value) = self.take_text() {
                if self.in_crosspost_source {
                    self.entry.crosspost_source_id = Some(value);
                } else {
                    self.entry.id = Some(value);
                }
            }
            self.in_id = false;
        } else if tag.is_qualified("activity:verb") && self.in_activity_verb {
            if let Some(value) = self.take_text() {
                self.entry.activity_verb = Some(value);
            }
            self.in_activity_verb = false;
        } else if tag.is_qualified("crosspost:source") {
            self.in_crosspost_source = false;
        } else if tag.is("source") {
            self.in_source = false;
        } else if tag.is_qualified("activity:service") {
            self.in_activity_service = false;
        }
    }

    fn finish(self) -> Parsed {
        Parsed::FeedEntry(self.entry)
    }
}

// ── FeedHandler ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum FeedField {
    Title,
    Updated,
    Id,
    Generator,
}

/// `<feed>`: header fields, feed-level links, and every `<entry>` in document order.
#[derive(Debug, Default)]
pub struct FeedHandler {
    feed: Feed,
    text: FieldText<FeedField>,
}

impl FeedHandler {
    fn field(tag: Tag<'_>) -> Option<FeedField> {
        if tag.is(TITLE) {
            Some(FeedField::Title)
        } else if tag.is(UPDATED) {
            Some(FeedField::Updated)
        } else if tag.is(ID) {
            Some(FeedField::Id)
        } else if tag.is("generator") {
            Some(FeedField::Generator)
        } else {
            None
        }
    }
}

impl ElementHandler for FeedHandler {
    fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        if tag.is(LINK) {
            return Some(Handler::link());
        }
        if tag.is(ENTRY) {
            return Some(Handler::feed_entry());
        }
        if let Some(field) = Self::field(tag) {
            match field {
                FeedField::Title => {
                    if let Some(t) = attributes.owned("type") {
                        self.feed.title_type = Some(t);
                    }
                }
                FeedField::Generator => {
                    if let Some(uri) = attributes.owned("uri") {
                        self.feed.generator_uri = Some(uri);
                    }
                }
                _ => {}
            }
            self.text.enter(field);
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        match child {
            Some(Parsed::Link(link)) => self.feed.links.push(link),
            Some(Parsed::FeedEntry(entry)) => self.feed.entries.push(entry),
            Some(_) => {}
            None => {
                let Some(field) = Self::field(tag) else {
                    return;
                };
                let Some(value) = self.text.leave(field) else {
                    return;
                };
                match field {
                    FeedField::Title => self.feed.title = Some(value),
                    FeedField::Updated => self.feed.updated = parse_date(&value),
                    FeedField::Id => self.feed.id = Some(value),
                    FeedField::Generator => self.feed.generator = Some(value),
                }
            }
        }
    }

    fn finish(self) -> Parsed {
        Parsed::Feed(self.feed)
    }
}

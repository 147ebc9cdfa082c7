/*
 * entity.rs
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

//! Handlers for the small building blocks shared by entries and comments:
//! links, replies, content, authors, activity objects and visibility lists.

use log::warn;

use crate::model::{AclEntry, Activity, Author, Content, Link, Reply};

use super::handler::{Attributes, ElementHandler, FieldText, Handler, Parsed, Tag};

const LINK: &str = "link";
const CONTENT: &str = "content";
const ACTIVITY_OBJECT_TYPE: &str = "activity:object-type";

// ── LinkHandler ───────────────────────────────────────────────────────

/// `<link href rel type buzz:count/>`: everything comes from attributes.
#[derive(Debug, Default)]
pub struct LinkHandler {
    link: Link,
    opened: bool,
}

impl ElementHandler for LinkHandler {
    fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        // Attributes come from the handler's own root tag only.
        if tag.is(LINK) && !self.opened {
            self.opened = true;
            self.link.href = attributes.owned("href");
            self.link.rel = attributes.owned("rel");
            self.link.media_type = attributes.owned("type");
            self.link.count = attributes.value("buzz:count").and_then(|c| match c.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!("ignoring non-numeric buzz:count {:?}", c);
                    None
                }
            });
        }
        None
    }

    fn end_element(&mut self, _tag: Tag<'_>, _child: Option<Parsed>) {}

    fn finish(self) -> Parsed {
        Parsed::Link(self.link)
    }
}

// ── ReplyHandler ──────────────────────────────────────────────────────

/// `<thr:in-reply-to href ref type/>`.
#[derive(Debug, Default)]
pub struct ReplyHandler {
    reply: Reply,
    opened: bool,
}

impl ElementHandler for ReplyHandler {
    fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        if tag.is_qualified("thr:in-reply-to") && !self.opened {
            self.opened = true;
            self.reply.href = attributes.owned("href");
            self.reply.reference = attributes.owned("ref");
            self.reply.media_type = attributes.owned("type");
        }
        None
    }

    fn end_element(&mut self, _tag: Tag<'_>, _child: Option<Parsed>) {}

    fn finish(self) -> Parsed {
        Parsed::Reply(self.reply)
    }
}

// ── ContentHandler ────────────────────────────────────────────────────

/// `<content type="…">text</content>` and `<buzz:original-content>`.
/// All character data in the subtree is the content text.
#[derive(Debug, Default)]
pub struct ContentHandler {
    content: Content,
    opened: bool,
    text: String,
}

impl ElementHandler for ContentHandler {
    fn start_element(&mut self, _tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        if !self.opened {
            self.opened = true;
            self.content.media_type = attributes.owned("type");
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn end_element(&mut self, _tag: Tag<'_>, _child: Option<Parsed>) {}

    fn finish(mut self) -> Parsed {
        if !self.text.is_empty() {
            self.content.text = Some(self.text);
        }
        Parsed::Content(self.content)
    }
}

// ── AuthorHandler ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum AuthorField {
    Id,
    Name,
    Uri,
    ObjectType,
}

#[derive(Debug, Default)]
pub struct AuthorHandler {
    author: Author,
    text: FieldText<AuthorField>,
}

impl AuthorHandler {
    fn field(tag: Tag<'_>) -> Option<AuthorField> {
        if tag.is_qualified("poco:id") {
            Some(AuthorField::Id)
        } else if tag.is("name") {
            Some(AuthorField::Name)
        } else if tag.is("uri") {
            Some(AuthorField::Uri)
        } else if tag.is_qualified(ACTIVITY_OBJECT_TYPE) {
            Some(AuthorField::ObjectType)
        } else {
            None
        }
    }
}

impl ElementHandler for AuthorHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if let Some(field) = Self::field(tag) {
            self.text.enter(field);
        } else if tag.is(LINK) {
            return Some(Handler::link());
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        if let Some(Parsed::Link(link)) = child {
            self.author.links.push(link);
            return;
        }
        let Some(field) = Self::field(tag) else {
            return;
        };
        let Some(value) = self.text.leave(field) else {
            return;
        };
        match field {
            AuthorField::Id => self.author.id = Some(value),
            AuthorField::Name => self.author.name = Some(value),
            AuthorField::Uri => self.author.uri = Some(value),
            AuthorField::ObjectType => self.author.activity_object_type = Some(value),
        }
    }

    fn finish(self) -> Parsed {
        Parsed::Author(self.author)
    }
}

// ── ActivityHandler ───────────────────────────────────────────────────

/// `<activity:object>`: object type, plus a nested content and link.
#[derive(Debug, Default)]
pub struct ActivityHandler {
    activity: Activity,
    text: FieldText<()>,
}

impl ElementHandler for ActivityHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if tag.is_qualified(ACTIVITY_OBJECT_TYPE) {
            self.text.enter(());
        } else if tag.is(CONTENT) {
            return Some(Handler::content());
        } else if tag.is(LINK) {
            return Some(Handler::link());
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        match child {
            Some(Parsed::Content(content)) => self.activity.content = Some(content),
            Some(Parsed::Link(link)) => self.activity.link = Some(link),
            Some(_) => {}
            None => {
                if tag.is_qualified(ACTIVITY_OBJECT_TYPE) {
                    if let Some(value) = self.text.leave(()) {
                        self.activity.activity_object_type = Some(value);
                    }
                }
            }
        }
    }

    fn finish(self) -> Parsed {
        Parsed::Activity(self.activity)
    }
}

// ── VisibilityHandler ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum AclField {
    Id,
    Uri,
    Name,
}

/// `<buzz:visibility>` holding `<buzz:aclentry type="…">` grants.
#[derive(Debug, Default)]
pub struct VisibilityHandler {
    entries: Vec<AclEntry>,
    text: FieldText<AclField>,
}

impl VisibilityHandler {
    fn field(tag: Tag<'_>) -> Option<AclField> {
        if tag.is_qualified("poco:id") {
            Some(AclField::Id)
        } else if tag.is_qualified("uri") {
            Some(AclField::Uri)
        } else if tag.is_qualified("poco:name") {
            Some(AclField::Name)
        } else {
            None
        }
    }
}

impl ElementHandler for VisibilityHandler {
    fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        if tag.is_qualified("buzz:aclentry") {
            self.entries.push(AclEntry {
                kind: attributes.owned("type"),
                ..AclEntry::default()
            });
        } else if let Some(field) = Self::field(tag) {
            self.text.enter(field);
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, _child: Option<Parsed>) {
        let Some(field) = Self::field(tag) else {
            return;
        };
        let value = self.text.leave(field);
        // Fields outside an aclentry have nowhere to go.
        let (Some(value), Some(entry)) = (value, self.entries.last_mut()) else {
            return;
        };
        match field {
            AclField::Id => entry.id = Some(value),
            AclField::Uri => entry.uri = Some(value),
            AclField::Name => entry.name = Some(value),
        }
    }

    fn finish(self) -> Parsed {
        Parsed::Visibility(self.entries)
    }
}

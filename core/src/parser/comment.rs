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

//! Handlers for comment entries and `<feed>` documents of comments.

use crate::model::{Comment, CommentsFeed};

use super::date::parse_date;
use super::handler::{Attributes, ElementHandler, FieldText, Handler, Parsed, Tag};

const ORIGINAL_CONTENT: &str = "buzz:original-content";

// ── CommentHandler ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum CommentField {
    ObjectType,
    Published,
    Id,
}

#[derive(Debug, Default)]
pub struct CommentHandler {
    comment: Comment,
    text: FieldText<CommentField>,
}

impl CommentHandler {
    fn field(tag: Tag<'_>) -> Option<CommentField> {
        if tag.is_qualified("activity:object-type") {
            Some(CommentField::ObjectType)
        } else if tag.is("published") {
            Some(CommentField::Published)
        } else if tag.is("id") {
            Some(CommentField::Id)
        } else {
            None
        }
    }
}

impl ElementHandler for CommentHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if let Some(field) = Self::field(tag) {
            self.text.enter(field);
            None
        } else if tag.is("link") {
            Some(Handler::link())
        } else if tag.is("author") {
            Some(Handler::author())
        } else if tag.is("content") || tag.is_qualified(ORIGINAL_CONTENT) {
            Some(Handler::content())
        } else if tag.is_qualified("thr:in-reply-to") {
            Some(Handler::reply())
        } else {
            None
        }
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        match child {
            Some(Parsed::Content(content)) if tag.is_qualified(ORIGINAL_CONTENT) => {
                self.comment.original_content = Some(content)
            }
            Some(Parsed::Content(content)) => self.comment.content = Some(content),
            Some(Parsed::Author(author)) => self.comment.author = Some(author),
            Some(Parsed::Link(link)) => self.comment.links.push(link),
            Some(Parsed::Reply(reply)) => self.comment.reply = Some(reply),
            Some(_) => {}
            None => {
                let Some(field) = Self::field(tag) else {
                    return;
                };
                let Some(value) = self.text.leave(field) else {
                    return;
                };
                match field {
                    CommentField::ObjectType => self.comment.activity_object_type = Some(value),
                    CommentField::Published => self.comment.published = parse_date(&value),
                    CommentField::Id => self.comment.id = Some(value),
                }
            }
        }
    }

    fn finish(self) -> Parsed {
        Parsed::Comment(self.comment)
    }
}

// ── CommentsFeedHandler ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum CommentsFeedField {
    Title,
    Id,
    Generator,
}

#[derive(Debug, Default)]
pub struct CommentsFeedHandler {
    feed: CommentsFeed,
    text: FieldText<CommentsFeedField>,
}

impl CommentsFeedHandler {
    fn field(tag: Tag<'_>) -> Option<CommentsFeedField> {
        if tag.is("title") {
            Some(CommentsFeedField::Title)
        } else if tag.is("id") {
            Some(CommentsFeedField::Id)
        } else if tag.is("generator") {
            Some(CommentsFeedField::Generator)
        } else {
            None
        }
    }
}

impl ElementHandler for CommentsFeedHandler {
    fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        if tag.is("link") {
            return Some(Handler::link());
        }
        if tag.is("entry") {
            return Some(Handler::comment());
        }
        match Self::field(tag) {
            Some(CommentsFeedField::Title) => {
                if let Some(t) = attributes.owned("type") {
                    self.feed.title_type = Some(t);
                }
                self.text.enter(CommentsFeedField::Title);
            }
            Some(CommentsFeedField::Generator) => {
                if let Some(uri) = attributes.owned("uri") {
                    self.feed.generator_uri = Some(uri);
                }
                self.text.enter(CommentsFeedField::Generator);
            }
            Some(field) => self.text.enter(field),
            None => {}
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        match child {
            Some(Parsed::Link(link)) => self.feed.links.push(link),
            Some(Parsed::Comment(comment)) => self.feed.comments.push(comment),
            Some(_) => {}
            None => {
                let Some(field) = Self::field(tag) else {
                    return;
                };
                let Some(value) = self.text.leave(field) else {
                    return;
                };
                match field {
                    CommentsFeedField::Title => self.feed.title = Some(value),
                    CommentsFeedField::Id => self.feed.id = Some(value),
                    CommentsFeedField::Generator => self.feed.generator = Some(value),
                }
            }
        }
    }

    fn finish(self) -> Parsed {
        Parsed::CommentsFeed(self.feed)
    }
}

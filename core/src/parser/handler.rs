/*
 * handler.rs
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

//! Element handler contract for the streaming Atom decoder.
//!
//! A handler owns one element subtree. It sees the start tag of its own root
//! element first (forwarded by the stack right after it was created), then every
//! event inside that subtree, then the end tag of its root. When it recognises
//! the root of a nested structure it returns a fresh child handler from
//! `start_element`; the stack activates the child and, once the child's subtree
//! closes, hands the finished value back through `end_element`.

use crate::model::{
    AclEntry, Activity, Author, Comment, CommentsFeed, Content, Email, Feed, FeedEntry, Link,
    Photo, Reply, Url, UserProfile,
};

use super::comment::{CommentHandler, CommentsFeedHandler};
use super::entity::{
    ActivityHandler, AuthorHandler, ContentHandler, LinkHandler, ReplyHandler, VisibilityHandler,
};
use super::feed::{FeedEntryHandler, FeedHandler};
use super::profile::{
    EmailHandler, PhotoHandler, UrlHandler, UserProfileHandler, UsersProfilesHandler,
};

/// Element name as written in the document, plus its unprefixed local part.
///
/// No namespace resolution happens: `activity:object-type` is matched by its
/// qualified name, `title` by its local name, exactly as they appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub qname: &'a str,
    pub local: &'a str,
}

impl<'a> Tag<'a> {
    pub fn new(qname: &'a str) -> Self {
        let local = match qname.rfind(':') {
            Some(i) => &qname[i + 1..],
            None => qname,
        };
        Self { qname, local }
    }

    /// Compare against the local (unprefixed) name.
    pub fn is(&self, local: &str) -> bool {
        self.local == local
    }

    /// Compare against the qualified (prefixed) name.
    pub fn is_qualified(&self, qname: &str) -> bool {
        self.qname == qname
    }
}

/// Attributes of one start tag, keyed by qualified name, values unescaped.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Value of the named attribute; empty values count as absent.
    pub fn value(&self, qname: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == qname)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn owned(&self, qname: &str) -> Option<String> {
        self.value(qname).map(str::to_string)
    }
}

/// Finished value handed from a retired handler to its parent (or to the entry point).
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Link(Link),
    Reply(Reply),
    Content(Content),
    Author(Author),
    Activity(Activity),
    Visibility(Vec<AclEntry>),
    Email(Email),
    Url(Url),
    Photo(Photo),
    FeedEntry(FeedEntry),
    Feed(Feed),
    Comment(Comment),
    CommentsFeed(CommentsFeed),
    UserProfile(UserProfile),
    UsersProfiles(Vec<UserProfile>),
}

impl Parsed {
    /// Short name of the decoded entity, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Parsed::Link(_) => "link",
            Parsed::Reply(_) => "reply",
            Parsed::Content(_) => "content",
            Parsed::Author(_) => "author",
            Parsed::Activity(_) => "activity",
            Parsed::Visibility(_) => "visibility",
            Parsed::Email(_) => "email",
            Parsed::Url(_) => "url",
            Parsed::Photo(_) => "photo",
            Parsed::FeedEntry(_) => "feed entry",
            Parsed::Feed(_) => "feed",
            Parsed::Comment(_) => "comment",
            Parsed::CommentsFeed(_) => "comments feed",
            Parsed::UserProfile(_) => "user profile",
            Parsed::UsersProfiles(_) => "user profile list",
        }
    }
}

/// Events delivered to one handler. Unknown tags must fall through silently.
pub trait ElementHandler {
    /// Start tag inside (or of) this handler's subtree. Return a child handler to
    /// delegate the element that starts here.
    fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler>;

    /// Character data; may arrive in several chunks for one element.
    fn characters(&mut self, _text: &str) {}

    /// End tag inside (or of) this handler's subtree. `child` carries the value of
    /// a delegated element whose subtree just closed; `tag` is then that element's name.
    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>);

    /// Consume the handler and yield its value.
    fn finish(self) -> Parsed;
}

/// Discriminated handler record held by the delegation stack.
#[derive(Debug)]
pub enum Handler {
    Link(LinkHandler),
    Reply(ReplyHandler),
    Content(ContentHandler),
    Author(AuthorHandler),
    Activity(ActivityHandler),
    Visibility(VisibilityHandler),
    Email(EmailHandler),
    Url(UrlHandler),
    Photo(PhotoHandler),
    FeedEntry(FeedEntryHandler),
    Feed(FeedHandler),
    Comment(CommentHandler),
    CommentsFeed(CommentsFeedHandler),
    UserProfile(UserProfileHandler),
    UsersProfiles(UsersProfilesHandler),
}

macro_rules! dispatch {
    ($self:expr, $h:ident => $body:expr) => {
        match $self {
            Handler::Link($h) => $body,
            Handler::Reply($h) => $body,
            Handler::Content($h) => $body,
            Handler::Author($h) => $body,
            Handler::Activity($h) => $body,
            Handler::Visibility($h) => $body,
            Handler::Email($h) => $body,
            Handler::Url($h) => $body,
            Handler::Photo($h) => $body,
            Handler::FeedEntry($h) => $body,
            Handler::Feed($h) => $body,
            Handler::Comment($h) => $body,
            Handler::CommentsFeed($h) => $body,
            Handler::UserProfile($h) => $body,
            Handler::UsersProfiles($h) => $body,
        }
    };
}

impl Handler {
    pub fn link() -> Self {
        Handler::Link(LinkHandler::default())
    }

    pub fn reply() -> Self {
        Handler::Reply(ReplyHandler::default())
    }

    pub fn content() -> Self {
        Handler::Content(ContentHandler::default())
    }

    pub fn author() -> Self {
        Handler::Author(AuthorHandler::default())
    }

    pub fn activity() -> Self {
        Handler::Activity(ActivityHandler::default())
    }

    pub fn visibility() -> Self {
        Handler::Visibility(VisibilityHandler::default())
    }

    pub fn email() -> Self {
        Handler::Email(EmailHandler::default())
    }

    pub fn url() -> Self {
        Handler::Url(UrlHandler::default())
    }

    pub fn photo() -> Self {
        Handler::Photo(PhotoHandler::default())
    }

    pub fn feed_entry() -> Self {
        Handler::FeedEntry(FeedEntryHandler::default())
    }

    pub fn feed() -> Self {
        Handler::Feed(FeedHandler::default())
    }

    pub fn comment() -> Self {
        Handler::Comment(CommentHandler::default())
    }

    pub fn comments_feed() -> Self {
        Handler::CommentsFeed(CommentsFeedHandler::default())
    }

    pub fn user_profile() -> Self {
        Handler::UserProfile(UserProfileHandler::default())
    }

    pub fn users_profiles() -> Self {
        Handler::UsersProfiles(UsersProfilesHandler::default())
    }

    pub fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) -> Option<Handler> {
        dispatch!(self, h => h.start_element(tag, attributes))
    }

    pub fn characters(&mut self, text: &str) {
        dispatch!(self, h => h.characters(text))
    }

    pub fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        dispatch!(self, h => h.end_element(tag, child))
    }

    pub fn finish(self) -> Parsed {
        dispatch!(self, h => h.finish())
    }
}

/// Text collector for handlers whose fields are mutually exclusive leaf elements.
///
/// `enter` marks which field is open; character data is appended only while a
/// field is open; `leave` hands back the collected text when that same field closes.
#[derive(Debug)]
pub struct FieldText<F> {
    field: Option<F>,
    text: String,
}

impl<F> Default for FieldText<F> {
    fn default() -> Self {
        Self {
            field: None,
            text: String::new(),
        }
    }
}

impl<F: Copy + PartialEq> FieldText<F> {
    pub fn enter(&mut self, field: F) {
        self.field = Some(field);
        self.text.clear();
    }

    pub fn push(&mut self, text: &str) {
        if self.field.is_some() {
            self.text.push_str(text);
        }
    }

    /// Close `field`. Returns its text, or `None` when another field is open or no text arrived.
    pub fn leave(&mut self, field: F) -> Option<String> {
        if self.field != Some(field) {
            return None;
        }
        self.field = None;
        let text = std::mem::take(&mut self.text);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_local_and_qualified() {
        let t = Tag::new("activity:object-type");
        assert_eq!(t.local, "object-type");
        assert!(t.is_qualified("activity:object-type"));
        assert!(!t.is("activity:object-type"));

        let t = Tag::new("title");
        assert_eq!(t.local, "title");
        assert!(t.is("title"));
        assert!(t.is_qualified("title"));
    }

    #[test]
    fn test_attributes_empty_is_absent() {
        let mut a = Attributes::new();
        a.push("href", "");
        a.push("rel", "alternate");
        assert_eq!(a.value("href"), None);
        assert_eq!(a.value("rel"), Some("alternate"));
        assert_eq!(a.value("type"), None);
    }

    #[derive(Clone, Copy, PartialEq)]
    enum F {
        A,
        B,
    }

    #[test]
    fn test_field_text_collects_chunks() {
        let mut ft = FieldText::default();
        ft.push("ignored");
        ft.enter(F::A);
        ft.push("Hello, ");
        ft.push("world");
        assert_eq!(ft.leave(F::B), None);
        assert_eq!(ft.leave(F::A).as_deref(), Some("Hello, world"));
        ft.enter(F::B);
        assert_eq!(ft.leave(F::B), None);
    }
}

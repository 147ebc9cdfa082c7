/*
 * stack.rs
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

//! Handler delegation stack.
//!
//! Frames are pushed when a handler delegates a nested element and popped when
//! that element's subtree closes. Popping happens before the end event is
//! bubbled to the parent, so a retired handler never sees another event.

use log::trace;

use crate::error::{BuzzError, Result};

use super::handler::{Attributes, Handler, Parsed, Tag};

#[derive(Debug)]
struct Frame {
    handler: Handler,
    /// Stack index of the delegating handler; `None` for the document root.
    parent: Option<usize>,
    /// Elements currently open within this frame's subtree, its own root included.
    depth: usize,
}

impl Frame {
    fn new(handler: Handler, parent: Option<usize>) -> Self {
        Self {
            handler,
            parent,
            depth: 0,
        }
    }
}

/// Drives a root handler and its active descendants from tokenizer events.
#[derive(Debug)]
pub struct HandlerStack {
    frames: Vec<Frame>,
    result: Option<Parsed>,
}

impl HandlerStack {
    pub fn new(root: Handler) -> Self {
        Self {
            frames: vec![Frame::new(root, None)],
            result: None,
        }
    }

    /// True once the root handler's element has closed; later events are ignored.
    pub fn is_done(&self) -> bool {
        self.result.is_some()
    }

    /// Number of active handlers (root included).
    pub fn active_handlers(&self) -> usize {
        self.frames.len()
    }

    pub fn start_element(&mut self, tag: Tag<'_>, attributes: &Attributes) {
        if self.is_done() {
            return;
        }
        let top = self.frames.len() - 1;
        let frame = &mut self.frames[top];
        frame.depth += 1;
        if let Some(child) = frame.handler.start_element(tag, attributes) {
            trace!("delegating <{}> at stack depth {}", tag.qname, top + 1);
            let mut child = Frame::new(child, Some(top));
            child.depth = 1;
            // The child consumes its own root tag (and its attributes).
            let nested = child.handler.start_element(tag, attributes);
            debug_assert!(nested.is_none(), "handler delegated its own root <{}>", tag.qname);
            self.frames.push(child);
        }
    }

    pub fn characters(&mut self, text: &str) {
        if self.is_done() || text.is_empty() {
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.handler.characters(text);
        }
    }

    pub fn end_element(&mut self, tag: Tag<'_>) {
        if self.is_done() {
            return;
        }
        let mut finished: Option<Parsed> = None;
        while let Some(frame) = self.frames.last_mut() {
            frame.depth = frame.depth.saturating_sub(1);
            frame.handler.end_element(tag, finished.take());
            if frame.depth > 0 {
                return;
            }
            // Subtree closed: stop this handler, then bubble to its parent.
            let parent = frame.parent;
            let Some(frame) = self.frames.pop() else {
                return;
            };
            let value = frame.handler.finish();
            match parent {
                None => {
                    trace!("root <{}> closed", tag.qname);
                    self.result = Some(value);
                    return;
                }
                Some(index) => {
                    debug_assert_eq!(index, self.frames.len() - 1);
                    finished = Some(value);
                }
            }
        }
    }

    /// Value built by the root handler. Fails if the root element never closed.
    pub fn finish(self) -> Result<Parsed> {
        self.result.ok_or_else(|| {
            BuzzError::parsing("document ended before its root element was closed")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(stack: &mut HandlerStack, name: &str, attrs: &[(&str, &str)]) {
        let mut a = Attributes::new();
        for (k, v) in attrs {
            a.push(*k, *v);
        }
        stack.start_element(Tag::new(name), &a);
    }

    #[test]
    fn test_child_is_pushed_and_popped_at_its_end_tag() {
        let mut stack = HandlerStack::new(Handler::author());
        start(&mut stack, "author", &[]);
        assert_eq!(stack.active_handlers(), 1);
        start(&mut stack, "link", &[("href", "http://a"), ("rel", "alternate")]);
        assert_eq!(stack.active_handlers(), 2);
        stack.end_element(Tag::new("link"));
        assert_eq!(stack.active_handlers(), 1);
        assert!(!stack.is_done());
        stack.end_element(Tag::new("author"));
        assert!(stack.is_done());

        match stack.finish().unwrap() {
            Parsed::Author(a) => {
                assert_eq!(a.links.len(), 1);
                assert_eq!(a.links[0].href.as_deref(), Some("http://a"));
            }
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn test_events_after_root_closed_are_ignored() {
        let mut stack = HandlerStack::new(Handler::link());
        start(&mut stack, "link", &[("href", "http://first")]);
        stack.end_element(Tag::new("link"));
        start(&mut stack, "link", &[("href", "http://second")]);
        stack.end_element(Tag::new("link"));
        match stack.finish().unwrap() {
            Parsed::Link(l) => assert_eq!(l.href.as_deref(), Some("http://first")),
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn test_unclosed_root_is_an_error() {
        let mut stack = HandlerStack::new(Handler::feed());
        start(&mut stack, "feed", &[]);
        start(&mut stack, "entry", &[]);
        assert!(matches!(stack.finish(), Err(BuzzError::Parsing(_))));
    }

    #[test]
    fn test_same_named_element_inside_child_does_not_retire_it() {
        // Depth tracking keeps the author alive across an unrelated nested <author>.
        let mut stack = HandlerStack::new(Handler::feed_entry());
        start(&mut stack, "entry", &[]);
        start(&mut stack, "author", &[]);
        start(&mut stack, "name", &[]);
        stack.characters("Ann");
        stack.end_element(Tag::new("name"));
        start(&mut stack, "author", &[]);
        stack.end_element(Tag::new("author"));
        assert_eq!(stack.active_handlers(), 2);
        stack.end_element(Tag::new("author"));
        assert_eq!(stack.active_handlers(), 1);
        stack.end_element(Tag::new("entry"));
        match stack.finish().unwrap() {
            Parsed::FeedEntry(e) => {
                assert_eq!(e.author.and_then(|a| a.name).as_deref(), Some("Ann"));
            }
            other => panic!("unexpected {}", other.kind()),
        }
    }
}

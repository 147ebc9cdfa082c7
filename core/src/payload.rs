/*
 * payload.rs
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

//! Atom entry bodies for create and update requests.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::{BuzzError, Result};
use crate::model::{Content, Link};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const BUZZ_NS: &str = "http://schemas.google.com/buzz/2010";

/// Build the `<entry>` document for a post or comment.
///
/// `content` must carry non-empty text; `link`, when given, must carry an `href`.
/// Absent `type`/`rel` values are omitted rather than written empty.
pub fn construct_payload(content: &Content, link: Option<&Link>) -> Result<Vec<u8>> {
    let text = content
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BuzzError::validation("content text is required"))?;
    let link_href = match link {
        Some(l) => Some(
            l.href
                .as_deref()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| BuzzError::validation("link href is required"))?,
        ),
        None => None,
    };

    let mut out = Vec::new();
    let mut writer = Writer::new(&mut out);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let entry = BytesStart::new("entry").with_attributes([("xmlns", ATOM_NS), ("xmlns:buzz", BUZZ_NS)]);
    writer.write_event(Event::Start(entry))?;

    let mut content_start = BytesStart::new("content");
    if let Some(t) = content.media_type.as_deref().filter(|t| !t.is_empty()) {
        content_start.push_attribute(("type", t));
    }
    writer.write_event(Event::Start(content_start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("content")))?;

    if let (Some(link), Some(href)) = (link, link_href) {
        let mut link_start = BytesStart::new("link");
        if let Some(rel) = link.rel.as_deref().filter(|r| !r.is_empty()) {
            link_start.push_attribute(("rel", rel));
        }
        link_start.push_attribute(("href", href));
        if let Some(t) = link.media_type.as_deref().filter(|t| !t.is_empty()) {
            link_start.push_attribute(("type", t));
        }
        writer.write_event(Event::Empty(link_start))?;
    }

    writer.write_event(Event::End(BytesEnd::new("entry")))?;
    Ok(out)
}

/*
 * profile.rs
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

//! Handlers for Portable Contacts profiles: `<entry>` with `<emails>`, `<urls>`
//! and `<photos>` children, and `<feed>` lists of them (followers/following).

use crate::model::{Email, Photo, Url, UserProfile};

use super::handler::{Attributes, ElementHandler, FieldText, Handler, Parsed, Tag};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ValueField {
    Value,
    Type,
    Primary,
}

fn value_field(tag: Tag<'_>) -> Option<ValueField> {
    if tag.is("value") {
        Some(ValueField::Value)
    } else if tag.is("type") {
        Some(ValueField::Type)
    } else if tag.is("primary") {
        Some(ValueField::Primary)
    } else {
        None
    }
}

// ── EmailHandler ──────────────────────────────────────────────────────

/// One `<emails>` element: `<value>`, `<type>`, `<primary>`.
#[derive(Debug, Default)]
pub struct EmailHandler {
    email: Email,
    text: FieldText<ValueField>,
}

impl ElementHandler for EmailHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if let Some(field) = value_field(tag) {
            self.text.enter(field);
        }
        None
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, _child: Option<Parsed>) {
        let Some(field) = value_field(tag) else {
            return;
        };
        let Some(value) = self.text.leave(field) else {
            return;
        };
        match field {
            ValueField::Value => self.email.value = Some(value),
            ValueField::Type => self.email.kind = Some(value),
            ValueField::Primary => self.email.primary = value.trim().eq_ignore_ascii_case("true"),
        }
    }

    fn finish(self) -> Parsed {
        Parsed::Email(self.email)
    }
}

// ── UrlHandler / PhotoHandler ─────────────────────────────────────────

/// `<value>` + `<type>` pair shared by urls and photos.
#[derive(Debug, Default)]
struct TypedValue {
    value: Option<String>,
    kind: Option<String>,
    text: FieldText<ValueField>,
}

impl TypedValue {
    fn start(&mut self, tag: Tag<'_>) {
        match value_field(tag) {
            Some(ValueField::Primary) | None => {}
            Some(field) => self.text.enter(field),
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        let Some(field) = value_field(tag) else {
            return;
        };
        let Some(value) = self.text.leave(field) else {
            return;
        };
        match field {
            ValueField::Value => self.value = Some(value),
            ValueField::Type => self.kind = Some(value),
            ValueField::Primary => {}
        }
    }
}

/// One `<urls>` element.
#[derive(Debug, Default)]
pub struct UrlHandler {
    fields: TypedValue,
}

impl ElementHandler for UrlHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        self.fields.start(tag);
        None
    }

    fn characters(&mut self, text: &str) {
        self.fields.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, _child: Option<Parsed>) {
        self.fields.end(tag);
    }

    fn finish(self) -> Parsed {
        Parsed::Url(Url {
            value: self.fields.value,
            kind: self.fields.kind,
        })
    }
}

/// One `<photos>` element.
#[derive(Debug, Default)]
pub struct PhotoHandler {
    fields: TypedValue,
}

impl ElementHandler for PhotoHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        self.fields.start(tag);
        None
    }

    fn characters(&mut self, text: &str) {
        self.fields.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, _child: Option<Parsed>) {
        self.fields.end(tag);
    }

    fn finish(self) -> Parsed {
        Parsed::Photo(Photo {
            value: self.fields.value,
            kind: self.fields.kind,
        })
    }
}

// ── UserProfileHandler ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum ProfileField {
    Id,
    DisplayName,
    ProfileUrl,
}

#[derive(Debug, Default)]
pub struct UserProfileHandler {
    profile: UserProfile,
    text: FieldText<ProfileField>,
}

impl UserProfileHandler {
    fn field(tag: Tag<'_>) -> Option<ProfileField> {
        if tag.is("id") {
            Some(ProfileField::Id)
        } else if tag.is("displayName") {
            Some(ProfileField::DisplayName)
        } else if tag.is("profileUrl") {
            Some(ProfileField::ProfileUrl)
        } else {
            None
        }
    }
}

impl ElementHandler for UserProfileHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if let Some(field) = Self::field(tag) {
            self.text.enter(field);
            None
        } else if tag.is("emails") {
            Some(Handler::email())
        } else if tag.is("urls") {
            Some(Handler::url())
        } else if tag.is("photos") {
            Some(Handler::photo())
        } else {
            None
        }
    }

    fn characters(&mut self, text: &str) {
        self.text.push(text);
    }

    fn end_element(&mut self, tag: Tag<'_>, child: Option<Parsed>) {
        match child {
            Some(Parsed::Email(email)) => self.profile.emails.push(email),
            Some(Parsed::Url(url)) => self.profile.urls.push(url),
            Some(Parsed::Photo(photo)) => self.profile.photos.push(photo),
            Some(_) => {}
            None => {
                let Some(field) = Self::field(tag) else {
                    return;
                };
                let Some(value) = self.text.leave(field) else {
                    return;
                };
                match field {
                    ProfileField::Id => self.profile.id = Some(value),
                    ProfileField::DisplayName => self.profile.name = Some(value),
                    ProfileField::ProfileUrl => self.profile.profile_url = Some(value),
                }
            }
        }
    }

    fn finish(self) -> Parsed {
        Parsed::UserProfile(self.profile)
    }
}

// ── UsersProfilesHandler ──────────────────────────────────────────────

/// `<feed>` of profile entries; everything but `<entry>` is ignored.
#[derive(Debug, Default)]
pub struct UsersProfilesHandler {
    profiles: Vec<UserProfile>,
}

impl ElementHandler for UsersProfilesHandler {
    fn start_element(&mut self, tag: Tag<'_>, _attributes: &Attributes) -> Option<Handler> {
        if tag.is("entry") {
            Some(Handler::user_profile())
        } else {
            None
        }
    }

    fn end_element(&mut self, _tag: Tag<'_>, child: Option<Parsed>) {
        if let Some(Parsed::UserProfile(profile)) = child {
            self.profiles.push(profile);
        }
    }

    fn finish(self) -> Parsed {
        Parsed::UsersProfiles(self.profiles)
    }
}

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

//! HTTP request model and the transport seam.
//!
//! The library never opens sockets itself. Every request goes through a
//! [`Transport`] supplied by the embedding application; tests use in-memory doubles.

mod request;

pub use request::{Method, Request, Response, ATOM_CONTENT_TYPE, FORM_CONTENT_TYPE};

use crate::error::Result;

/// Sends one request and returns the response, whatever its status.
///
/// Non-2xx responses must be returned as `Ok(Response)`; `Err` is reserved for
/// failures where no response was received (connection refused, TLS, timeout).
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<Response> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<Response> {
        (**self).send(request)
    }
}

/// In-memory transport for unit tests: replays queued responses and records requests.
#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::{Request, Response, Transport};
    use crate::error::{BuzzError, Result};

    #[derive(Default)]
    pub struct MockTransport {
        responses: RefCell<VecDeque<Response>>,
        pub requests: RefCell<Vec<Request>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Response::new(status, body.as_bytes().to_vec()));
            self
        }

        pub fn sent(&self) -> usize {
            self.requests.borrow().len()
        }

        pub fn last(&self) -> Request {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for MockTransport {
        fn send(&self, request: &Request) -> Result<Response> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| BuzzError::io("no response queued"))
        }
    }
}

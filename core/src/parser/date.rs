/*
 * date.rs
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

//! Atom timestamps: `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`, always UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;

const ATOM_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parse an Atom timestamp. Anything that does not match the fixed format is `None`.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    match NaiveDateTime::parse_from_str(text.trim(), ATOM_DATE_FORMAT) {
        Ok(dt) => Some(dt.and_utc()),
        Err(e) => {
            debug!("ignoring unparsable timestamp {:?}: {}", text, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_date() {
        let dt = parse_date("2010-02-09T17:44:08.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2010, 2, 9, 17, 44, 8).unwrap());
    }

    #[test]
    fn test_parse_date_keeps_millis_and_24h_clock() {
        let dt = parse_date("2010-12-31T23:59:59.123Z").unwrap();
        assert_eq!(dt.year(), 2010);
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert_eq!(parse_date("2010-02-09T17:44:08Z"), None);
        assert_eq!(parse_date("2010-02-09"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }
}

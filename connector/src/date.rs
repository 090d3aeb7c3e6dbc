/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Calendar dates on the wire.
//!
//! The server stores dates as date-times at midnight. Incoming values may be
//! a bare `YYYY-MM-DD` or a full ISO date-time; only the date part is kept.
//! Outgoing values are always `YYYY-MM-DDT00:00:00`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const WIRE_FORMAT: &str = "%Y-%m-%dT00:00:00";

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    let day = s.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, DATE_FORMAT)
}

pub fn to_wire(date: &NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

pub mod midnight {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_wire(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", raw, e)))
    }
}

pub mod midnight_option {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&to_wire(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_date(&raw)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid date `{}`: {}", raw, e))),
            None => Ok(None),
        }
    }
}

/// Patch field that can be left untouched (`None`), cleared (`Some(None)`)
/// or set. Pair with `skip_serializing_if = "Option::is_none"`.
pub mod midnight_patch {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<Option<NaiveDate>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(Some(date)) => serializer.serialize_str(&to_wire(date)),
            _ => serializer.serialize_none(),
        }
    }
}

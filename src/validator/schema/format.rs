// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! String formats checked by the `format` keyword.

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use url::Url;

/// A format validated by [super::assertion::SchemaAssertion::Format]. Format
/// names not listed here are treated as annotations and never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// RFC 3339 `date-time`, e.g. `2025-01-31T12:00:00Z`.
    DateTime,
    /// RFC 3339 `full-date`, e.g. `2025-01-31`.
    Date,
    /// RFC 3339 `full-time`, e.g. `12:00:00+02:00`.
    Time,
    /// An absolute URI.
    Uri,
    /// An absolute or relative URI.
    UriReference,
    Email,
    Uuid,
    /// A regular expression accepted by the [regex] crate.
    Regex,
    /// A `#rgb` or `#rrggbb` hex color, as used by Lottie solid layers.
    Color,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date-time" => Some(Format::DateTime),
            "date" => Some(Format::Date),
            "time" => Some(Format::Time),
            "uri" => Some(Format::Uri),
            "uri-reference" => Some(Format::UriReference),
            "email" => Some(Format::Email),
            "uuid" => Some(Format::Uuid),
            "regex" => Some(Format::Regex),
            "color" => Some(Format::Color),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::DateTime => "date-time",
            Format::Date => "date",
            Format::Time => "time",
            Format::Uri => "uri",
            Format::UriReference => "uri-reference",
            Format::Email => "email",
            Format::Uuid => "uuid",
            Format::Regex => "regex",
            Format::Color => "color",
        }
    }

    pub fn matches(&self, s: &str) -> bool {
        match self {
            Format::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
            Format::Date => s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            Format::Time => {
                s.len() >= 9 && DateTime::parse_from_rfc3339(&format!("1970-01-01T{s}")).is_ok()
            }
            Format::Uri => !has_whitespace(s) && Url::parse(s).is_ok(),
            Format::UriReference => !has_whitespace(s) && is_uri_reference(s),
            Format::Email => is_email(s),
            Format::Uuid => is_hex_groups(s, &[8, 4, 4, 4, 12]),
            Format::Regex => Regex::new(s).is_ok(),
            Format::Color => s
                .strip_prefix('#')
                .is_some_and(|hex| matches!(hex.len(), 3 | 6) && is_hex(hex)),
        }
    }
}

fn has_whitespace(s: &str) -> bool {
    s.chars().any(|c| c.is_whitespace() || c == '\\')
}

fn is_uri_reference(s: &str) -> bool {
    if Url::parse(s).is_ok() {
        return true;
    }
    Url::parse("http://example.invalid/").and_then(|base| base.join(s)).is_ok()
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !has_whitespace(s)
        && !local.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_hex_groups(s: &str, lengths: &[usize]) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == lengths.len()
        && groups.iter().zip(lengths).all(|(g, len)| g.len() == *len && is_hex(g))
}

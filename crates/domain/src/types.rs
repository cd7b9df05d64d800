// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// ISO calendar date format used in every stored document.
const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A single calendar day, rendered and stored as `YYYY-MM-DD`.
///
/// Holidays, out-of-office intervals, and availability queries are all
/// expressed in whole days; no time-of-day or time zone is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(Date);

impl CalendarDate {
    /// Wraps a `time::Date`.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Creates a date from its year, month, and day components.
    ///
    /// # Errors
    ///
    /// Returns an error if the components do not name a real day.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidCalendarDate { year, month, day };
        let month_value: time::Month = time::Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month_value, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Returns the wrapped `time::Date`.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.0
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the following day, or `None` at the end of the representable range.
    #[must_use]
    pub fn next_day(&self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Number of days from `self` to `later`, counting both ends.
    ///
    /// Returns 0 when `later` precedes `self`.
    #[must_use]
    pub fn inclusive_days_until(&self, later: &Self) -> i64 {
        let span: i64 = (later.0 - self.0).whole_days();
        if span < 0 { 0 } else { span + 1 }
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: String = self.0.format(ISO_DATE).map_err(|_| std::fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl FromStr for CalendarDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s.trim(), ISO_DATE)
            .map(Self)
            .map_err(|e| DomainError::DateParseError {
                date_string: s.to_string(),
                error: e.to_string(),
            })
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Identifier of a roster member.
///
/// Ids are decimal strings assigned sequentially at creation time. Ordering
/// is numeric for decimal ids so that `"10"` sorts after `"9"`; any other
/// id sorts after all decimal ids, lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a member id from its string form.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Id assigned to the member created when the roster holds `current_count` members.
    #[must_use]
    pub fn next_for_count(current_count: usize) -> Self {
        Self((current_count + 1).to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse::<u64>().ok()
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for MemberId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for MemberId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A person on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Display name.
    pub name: String,
    /// Country the member works from, as shown to users.
    pub country: String,
    /// Optional sub-national region. Stored as an empty string when absent.
    #[serde(
        default,
        serialize_with = "serialize_region",
        deserialize_with = "deserialize_region"
    )]
    pub region: Option<String>,
}

impl Member {
    /// Creates a new `Member`.
    ///
    /// An empty or whitespace-only region is treated as no region.
    ///
    /// # Arguments
    ///
    /// * `name` - The member's display name
    /// * `country` - The member's country
    /// * `region` - The member's region, if any
    #[must_use]
    pub fn new(name: &str, country: &str, region: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            country: country.trim().to_string(),
            region: region
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        }
    }

    /// Returns the region as a string slice, if present.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

/// The full roster as persisted in the `members` record.
pub type MemberDirectory = BTreeMap<MemberId, Member>;

#[allow(clippy::ref_option)]
fn serialize_region<S: Serializer>(region: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(region.as_deref().unwrap_or(""))
}

fn deserialize_region<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|r| !r.trim().is_empty()))
}

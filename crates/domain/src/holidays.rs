// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Holiday catalog document.
//!
//! Holidays are kept in two buckets:
//!
//! - `national`: `country -> date -> name`
//! - `regional`: `country -> region -> date -> name`
//!
//! A national fact shadows a regional fact for the same country and date.
//! Shadowing is applied when facts are written by a populate or
//! regeneration pass (`insert_regional_shadowed`), never at query time.
//! Manually added holidays bypass shadowing.

use crate::types::CalendarDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dated holiday names for one country or one region.
pub type DatedHolidays = BTreeMap<CalendarDate, String>;

/// Scope of a holiday fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayScope {
    /// Applies to every member in a country.
    National,
    /// Applies to members in one region of a country.
    Regional,
}

impl HolidayScope {
    /// Returns the stored name of this scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::Regional => "regional",
        }
    }
}

impl std::fmt::Display for HolidayScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dated holiday as returned by a holiday data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayFact {
    /// The day of the holiday.
    pub date: CalendarDate,
    /// The holiday's name.
    pub name: String,
}

impl HolidayFact {
    /// Creates a new `HolidayFact`.
    #[must_use]
    pub fn new(date: CalendarDate, name: &str) -> Self {
        Self {
            date,
            name: name.to_string(),
        }
    }
}

/// One row of the flattened holiday listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayListing {
    /// Whether the holiday is national or regional.
    pub scope: HolidayScope,
    /// The country the holiday belongs to.
    pub country: String,
    /// The region, for regional holidays.
    pub region: Option<String>,
    /// The day of the holiday.
    pub date: CalendarDate,
    /// The holiday's name.
    pub name: String,
    /// The holiday's calendar year.
    pub year: i32,
}

/// The `holidays` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    /// National holidays keyed by country.
    #[serde(default)]
    pub national: BTreeMap<String, DatedHolidays>,
    /// Regional holidays keyed by country, then region.
    #[serde(default)]
    pub regional: BTreeMap<String, BTreeMap<String, DatedHolidays>>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every national and regional fact.
    pub fn clear(&mut self) {
        self.national.clear();
        self.regional.clear();
    }

    /// Returns true when the calendar holds no facts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.national.values().all(BTreeMap::is_empty)
            && self
                .regional
                .values()
                .flat_map(BTreeMap::values)
                .all(BTreeMap::is_empty)
    }

    /// Ensures a (possibly empty) national bucket exists for `country`.
    pub fn ensure_national_bucket(&mut self, country: &str) {
        self.national.entry(country.to_string()).or_default();
    }

    /// Ensures a (possibly empty) regional bucket exists for `country`/`region`.
    pub fn ensure_regional_bucket(&mut self, country: &str, region: &str) {
        self.regional
            .entry(country.to_string())
            .or_default()
            .entry(region.to_string())
            .or_default();
    }

    /// Writes a national fact, replacing any name already stored for the date.
    pub fn insert_national(&mut self, country: &str, fact: HolidayFact) {
        self.national
            .entry(country.to_string())
            .or_default()
            .insert(fact.date, fact.name);
    }

    /// Writes a regional fact unless the country already has a national
    /// fact on the same date.
    ///
    /// Returns true when the fact was written.
    pub fn insert_regional_shadowed(
        &mut self,
        country: &str,
        region: &str,
        fact: HolidayFact,
    ) -> bool {
        if self.has_national(country, &fact.date) {
            return false;
        }
        self.insert_regional(country, region, fact);
        true
    }

    /// Writes a regional fact with no shadowing check.
    pub fn insert_regional(&mut self, country: &str, region: &str, fact: HolidayFact) {
        self.regional
            .entry(country.to_string())
            .or_default()
            .entry(region.to_string())
            .or_default()
            .insert(fact.date, fact.name);
    }

    fn has_national(&self, country: &str, date: &CalendarDate) -> bool {
        self.national
            .get(country)
            .is_some_and(|dates| dates.contains_key(date))
    }

    fn regional_name(&self, country: &str, region: &str, date: &CalendarDate) -> Option<&str> {
        self.regional
            .get(country)
            .and_then(|regions| regions.get(region))
            .and_then(|dates| dates.get(date))
            .map(String::as_str)
    }

    fn national_name(&self, country: &str, date: &CalendarDate) -> Option<&str> {
        self.national
            .get(country)
            .and_then(|dates| dates.get(date))
            .map(String::as_str)
    }

    /// Returns true if `date` is a holiday for the country, or for the
    /// region when one is given.
    ///
    /// National facts are checked first; either scope is sufficient.
    #[must_use]
    pub fn is_holiday(&self, date: &CalendarDate, country: &str, region: Option<&str>) -> bool {
        if self.has_national(country, date) {
            return true;
        }
        region.is_some_and(|r| self.regional_name(country, r, date).is_some())
    }

    /// Returns the holiday name for `date`, preferring the regional label.
    ///
    /// Regional facts are consulted first. Both can only coexist on one date
    /// when a holiday was added manually.
    #[must_use]
    pub fn holiday_name(
        &self,
        date: &CalendarDate,
        country: &str,
        region: Option<&str>,
    ) -> Option<&str> {
        region
            .and_then(|r| self.regional_name(country, r, date))
            .or_else(|| self.national_name(country, date))
    }

    /// Total number of stored facts across both buckets.
    #[must_use]
    pub fn fact_count(&self) -> usize {
        let national: usize = self.national.values().map(BTreeMap::len).sum();
        let regional: usize = self
            .regional
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum();
        national + regional
    }

    /// Flattens the calendar into one row per fact, sorted by year, then
    /// scope (national first), then country, then date.
    #[must_use]
    pub fn sorted_listing(&self) -> Vec<HolidayListing> {
        let national = self.national.iter().flat_map(|(country, dates)| {
            dates.iter().map(move |(date, name)| HolidayListing {
                scope: HolidayScope::National,
                country: country.clone(),
                region: None,
                date: *date,
                name: name.clone(),
                year: date.year(),
            })
        });
        let regional = self.regional.iter().flat_map(|(country, regions)| {
            regions.iter().flat_map(move |(region, dates)| {
                dates.iter().map(move |(date, name)| HolidayListing {
                    scope: HolidayScope::Regional,
                    country: country.clone(),
                    region: Some(region.clone()),
                    date: *date,
                    name: name.clone(),
                    year: date.year(),
                })
            })
        });

        let mut listing: Vec<HolidayListing> = national.chain(regional).collect();
        listing.sort_by(|a, b| {
            (a.year, a.scope, &a.country, a.date).cmp(&(b.year, b.scope, &b.country, b.date))
        });
        listing
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_regional_fact_shadowed_by_national_on_same_date() {
        let mut calendar: HolidayCalendar = HolidayCalendar::new();
        calendar.insert_national("US", HolidayFact::new(date("2025-07-04"), "Independence Day"));

        let written: bool = calendar.insert_regional_shadowed(
            "US",
            "California",
            HolidayFact::new(date("2025-07-04"), "Independence Day"),
        );

        assert!(!written);
        assert!(
            calendar
                .regional
                .get("US")
                .and_then(|r| r.get("California"))
                .is_none_or(|d| !d.contains_key(&date("2025-07-04")))
        );
    }

    #[test]
    fn test_regional_fact_written_when_no_national_collision() {
        let mut calendar: HolidayCalendar = HolidayCalendar::new();
        calendar.insert_national("US", HolidayFact::new(date("2025-07-04"), "Independence Day"));

        let written: bool = calendar.insert_regional_shadowed(
            "US",
            "California",
            HolidayFact::new(date("2025-03-31"), "Cesar Chavez Day"),
        );

        assert!(written);
        assert!(calendar.is_holiday(&date("2025-03-31"), "US", Some("California")));
    }

    #[test]
    fn test_is_holiday_requires_region_for_regional_facts() {
        let mut calendar: HolidayCalendar = HolidayCalendar::new();
        calendar.insert_regional(
            "US",
            "California",
            HolidayFact::new(date("2025-03-31"), "Cesar Chavez Day"),
        );

        assert!(!calendar.is_holiday(&date("2025-03-31"), "US", None));
        assert!(!calendar.is_holiday(&date("2025-03-31"), "US", Some("Texas")));
        assert!(calendar.is_holiday(&date("2025-03-31"), "US", Some("California")));
    }

    #[test]
    fn test_holiday_name_prefers_regional_label() {
        let mut calendar: HolidayCalendar = HolidayCalendar::new();
        calendar.insert_national("AU", HolidayFact::new(date("2025-01-27"), "Australia Day"));
        calendar.insert_regional(
            "AU",
            "Victoria",
            HolidayFact::new(date("2025-01-27"), "Australia Day (Victoria)"),
        );

        assert_eq!(
            calendar.holiday_name(&date("2025-01-27"), "AU", Some("Victoria")),
            Some("Australia Day (Victoria)")
        );
        assert_eq!(
            calendar.holiday_name(&date("2025-01-27"), "AU", None),
            Some("Australia Day")
        );
        assert_eq!(calendar.holiday_name(&date("2025-01-28"), "AU", None), None);
    }

    #[test]
    fn test_sorted_listing_orders_year_scope_country_date() {
        let mut calendar: HolidayCalendar = HolidayCalendar::new();
        calendar.insert_national("US", HolidayFact::new(date("2026-01-01"), "New Year's Day"));
        calendar.insert_regional("AU", "Victoria", HolidayFact::new(date("2025-03-10"), "Labour Day"));
        calendar.insert_national("US", HolidayFact::new(date("2025-12-25"), "Christmas Day"));
        calendar.insert_national("AU", HolidayFact::new(date("2025-12-25"), "Christmas Day"));

        let listing: Vec<HolidayListing> = calendar.sorted_listing();
        let keys: Vec<(i32, HolidayScope, &str, String)> = listing
            .iter()
            .map(|l| (l.year, l.scope, l.country.as_str(), l.date.to_string()))
            .collect();

        assert_eq!(
            keys,
            vec![
                (2025, HolidayScope::National, "AU", String::from("2025-12-25")),
                (2025, HolidayScope::National, "US", String::from("2025-12-25")),
                (2025, HolidayScope::Regional, "AU", String::from("2025-03-10")),
                (2026, HolidayScope::National, "US", String::from("2026-01-01")),
            ]
        );
    }

    #[test]
    fn test_calendar_document_shape() {
        let mut calendar: HolidayCalendar = HolidayCalendar::new();
        calendar.insert_national("US", HolidayFact::new(date("2025-07-04"), "Independence Day"));
        calendar.insert_regional("US", "Texas", HolidayFact::new(date("2025-03-02"), "Texas Independence Day"));

        let value: serde_json::Value = serde_json::to_value(&calendar).unwrap();
        assert_eq!(value["national"]["US"]["2025-07-04"], "Independence Day");
        assert_eq!(
            value["regional"]["US"]["Texas"]["2025-03-02"],
            "Texas Independence Day"
        );

        let parsed: HolidayCalendar = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, calendar);
    }

    #[test]
    fn test_missing_buckets_deserialize_as_empty() {
        let parsed: HolidayCalendar = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.fact_count(), 0);
    }
}

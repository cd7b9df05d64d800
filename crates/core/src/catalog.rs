// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filling the holiday catalog from the holiday oracle.
//!
//! Two write paths exist. [`HolidaySource::populate`] adds one country (and
//! optionally one region) for one year on top of what is already stored.
//! [`HolidaySource::regenerate`] discards the whole catalog and rebuilds it
//! from the locations used by the roster. Manually added holidays do not
//! survive regeneration.
//!
//! Both paths apply the same rule: a regional fact is written only when the
//! country has no national fact on that date.

use std::collections::BTreeSet;
use std::sync::Arc;

use rollcall_domain::{HolidayCalendar, HolidayFact, MemberDirectory};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::directory::CountryDirectory;
use crate::error::CoreError;
use crate::oracle::HolidayOracle;

/// Summary of a regeneration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Facts written.
    pub count: usize,
    /// Years covered.
    pub years: Vec<i32>,
    /// Countries covered.
    pub countries: Vec<String>,
    /// Regions covered, as `Region (Country)`.
    pub regions: Vec<String>,
}

impl GenerationReport {
    /// One-line description used for the history log.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Generated {} holidays for {} years ({}) - Countries: {} and regions: {}",
            self.count,
            self.years.len(),
            join_years(&self.years),
            self.countries.join(", "),
            self.regions.join(", ")
        )
    }

    /// Short message for callers.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Generated {} holidays for {} years ({}) covering {} countries and {} regions",
            self.count,
            self.years.len(),
            join_years(&self.years),
            self.countries.len(),
            self.regions.len()
        )
    }
}

fn join_years(years: &[i32]) -> String {
    years
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

/// Writes oracle facts into a [`HolidayCalendar`].
///
/// Buckets are keyed by the country and region strings stored on members.
/// Codes are only used to query the oracle.
#[derive(Clone)]
pub struct HolidaySource {
    oracle: Arc<dyn HolidayOracle>,
    directory: CountryDirectory,
}

impl HolidaySource {
    /// Creates a source over an oracle and a country directory.
    #[must_use]
    pub fn new(oracle: Arc<dyn HolidayOracle>, directory: CountryDirectory) -> Self {
        Self { oracle, directory }
    }

    /// The country directory used to resolve codes.
    #[must_use]
    pub const fn directory(&self) -> &CountryDirectory {
        &self.directory
    }

    /// Adds one country's holidays for `year`, plus one region's when given.
    ///
    /// Existing facts are kept. Returns the number of facts written.
    pub fn populate(
        &self,
        calendar: &mut HolidayCalendar,
        country: &str,
        region: Option<&str>,
        year: i32,
    ) -> usize {
        let Some(code) = self.directory.country_code(country) else {
            info!(country = %country, "No holiday data available for country");
            return 0;
        };

        let mut written: usize = self.write_national(calendar, country, code, year);
        if let Some(region) = region.filter(|r| !r.trim().is_empty()) {
            written += self.write_regional(calendar, country, code, region, year);
        }

        debug!(country = %country, region = ?region, year, written, "Populated holidays");
        written
    }

    /// Clears `calendar` and rebuilds it for every location in `members`.
    ///
    /// National facts for every country and year are written before any
    /// regional fact so shadowing sees the complete national set.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no members, or no member has a country.
    /// The calendar is left untouched in that case.
    pub fn regenerate(
        &self,
        calendar: &mut HolidayCalendar,
        members: &MemberDirectory,
        years: &[i32],
    ) -> Result<GenerationReport, CoreError> {
        if members.is_empty() {
            return Err(CoreError::NoMembers);
        }

        let countries: BTreeSet<&str> = members
            .values()
            .map(|m| m.country.as_str())
            .filter(|c| !c.trim().is_empty())
            .collect();
        if countries.is_empty() {
            return Err(CoreError::NoCountries);
        }
        let regions: BTreeSet<(&str, &str)> = members
            .values()
            .filter(|m| !m.country.trim().is_empty())
            .filter_map(|m| m.region().map(|r| (m.country.as_str(), r)))
            .collect();

        calendar.clear();
        let mut count: usize = 0;

        for country in &countries {
            let Some(code) = self.directory.country_code(country) else {
                info!(country = %country, "No holiday data available for country");
                continue;
            };
            for year in years {
                count += self.write_national(calendar, country, code, *year);
            }
        }

        for (country, region) in &regions {
            let Some(code) = self.directory.country_code(country) else {
                continue;
            };
            for year in years {
                count += self.write_regional(calendar, country, code, region, *year);
            }
        }

        let report: GenerationReport = GenerationReport {
            count,
            years: years.to_vec(),
            countries: countries.iter().map(ToString::to_string).collect(),
            regions: regions
                .iter()
                .map(|(country, region)| format!("{region} ({country})"))
                .collect(),
        };
        info!(count, countries = report.countries.len(), regions = report.regions.len(), "Regenerated holiday catalog");
        Ok(report)
    }

    fn write_national(
        &self,
        calendar: &mut HolidayCalendar,
        country: &str,
        code: &str,
        year: i32,
    ) -> usize {
        calendar.ensure_national_bucket(country);
        let facts: Vec<HolidayFact> = match self.oracle.national(code, year) {
            Ok(facts) => facts,
            Err(e) => {
                warn!(country = %country, year, error = %e, "Failed to fetch national holidays");
                return 0;
            }
        };

        let written: usize = facts.len();
        for fact in facts {
            calendar.insert_national(country, fact);
        }
        written
    }

    fn write_regional(
        &self,
        calendar: &mut HolidayCalendar,
        country: &str,
        code: &str,
        region: &str,
        year: i32,
    ) -> usize {
        calendar.ensure_regional_bucket(country, region);
        let subdivision: String = self.directory.subdivision_code(country, region);
        let facts: Vec<HolidayFact> = match self.oracle.regional(code, &subdivision, year) {
            Ok(facts) => facts,
            Err(e) => {
                warn!(country = %country, region = %region, year, error = %e, "Failed to fetch regional holidays");
                return 0;
            }
        };

        let mut written: usize = 0;
        for fact in facts {
            if calendar.insert_regional_shadowed(country, region, fact) {
                written += 1;
            }
        }
        written
    }
}

impl std::fmt::Debug for HolidaySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidaySource")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

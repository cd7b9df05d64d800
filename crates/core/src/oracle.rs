// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Public holiday data sources.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use rollcall_domain::{CalendarDate, HolidayFact};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Public Nager.Date endpoint.
pub const DEFAULT_HOLIDAY_API: &str = "https://date.nager.at/api/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Holiday API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid holiday date {date}: {message}")]
    InvalidDate { date: String, message: String },
}

/// Answers which days are public holidays.
///
/// Given an ISO country code (and optionally a subdivision code) and a
/// year, returns the dated holidays that apply.
pub trait HolidayOracle: Send + Sync {
    /// Holidays observed nationwide in `country_code` during `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data source cannot be queried.
    fn national(&self, country_code: &str, year: i32) -> Result<Vec<HolidayFact>, OracleError>;

    /// Holidays observed only in one subdivision of `country_code` during `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data source cannot be queried.
    fn regional(
        &self,
        country_code: &str,
        subdivision: &str,
        year: i32,
    ) -> Result<Vec<HolidayFact>, OracleError>;
}

#[derive(Debug, Deserialize)]
struct PublicHoliday {
    date: String,
    name: String,
    #[serde(default)]
    global: bool,
    #[serde(default)]
    counties: Option<Vec<String>>,
}

/// [`HolidayOracle`] backed by the Nager.Date public holiday API.
#[derive(Debug, Clone)]
pub struct NagerOracle {
    http: Client,
    base_url: String,
}

impl NagerOracle {
    /// Creates an oracle against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OracleError> {
        let http: Client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url: String = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn fetch(&self, country_code: &str, year: i32) -> Result<Vec<PublicHoliday>, OracleError> {
        let url: String = format!("{}/PublicHolidays/{year}/{country_code}", self.base_url);
        debug!(url = %url, "Fetching public holidays");

        let response: Response = self.http.get(&url).send()?;
        let status: StatusCode = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let message: String = response.text().unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }
}

impl HolidayOracle for NagerOracle {
    fn national(&self, country_code: &str, year: i32) -> Result<Vec<HolidayFact>, OracleError> {
        let rows: Vec<PublicHoliday> = self.fetch(country_code, year)?;
        to_facts(rows.iter().filter(|row| row.global))
    }

    fn regional(
        &self,
        country_code: &str,
        subdivision: &str,
        year: i32,
    ) -> Result<Vec<HolidayFact>, OracleError> {
        let county: String = format!("{country_code}-{subdivision}");
        let rows: Vec<PublicHoliday> = self.fetch(country_code, year)?;
        to_facts(rows.iter().filter(|row| observed_in(row, &county)))
    }
}

/// True for a non-nationwide row that lists `county` among its subdivisions.
fn observed_in(row: &PublicHoliday, county: &str) -> bool {
    !row.global
        && row
            .counties
            .as_ref()
            .is_some_and(|counties| counties.iter().any(|c| c.eq_ignore_ascii_case(county)))
}

fn to_facts<'a>(
    rows: impl Iterator<Item = &'a PublicHoliday>,
) -> Result<Vec<HolidayFact>, OracleError> {
    rows.map(|row| {
        let date: CalendarDate =
            row.date
                .parse()
                .map_err(|e: rollcall_domain::DomainError| OracleError::InvalidDate {
                    date: row.date.clone(),
                    message: e.to_string(),
                })?;
        Ok(HolidayFact::new(date, &row.name))
    })
    .collect()
}

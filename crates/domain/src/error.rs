// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::CalendarDate;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Member name is empty or invalid.
    InvalidName(String),
    /// Country is empty or invalid.
    InvalidCountry(String),
    /// Holiday name is empty or invalid.
    InvalidHolidayName(String),
    /// Failed to parse a calendar date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A calendar date could not be constructed from its components.
    InvalidCalendarDate {
        /// The year component.
        year: i32,
        /// The month component.
        month: u8,
        /// The day component.
        day: u8,
    },
    /// An out-of-office interval ends before it starts.
    InvalidDateRange {
        /// The first day of the interval.
        start: CalendarDate,
        /// The last day of the interval.
        end: CalendarDate,
    },
    /// Month value is outside 1..=12.
    InvalidMonth(u8),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidCountry(msg) => write!(f, "Invalid country: {msg}"),
            Self::InvalidHolidayName(msg) => write!(f, "Invalid holiday name: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidCalendarDate { year, month, day } => {
                write!(f, "Invalid calendar date: {year:04}-{month:02}-{day:02}")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: {end} is before {start}")
            }
            Self::InvalidMonth(month) => {
                write!(f, "Invalid month: {month}. Must be between 1 and 12")
            }
        }
    }
}

impl std::error::Error for DomainError {}

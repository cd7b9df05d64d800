// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod error;
mod holidays;
mod ooo;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::{Availability, DayAvailability, days_in_month, resolve, resolve_month};
pub use error::DomainError;
pub use holidays::{DatedHolidays, HolidayCalendar, HolidayFact, HolidayListing, HolidayScope};
pub use ooo::{DEFAULT_OOO_REASON, OooEntry, OooLedger};
pub use types::{CalendarDate, Member, MemberDirectory, MemberId};
pub use validation::{validate_holiday_name, validate_member_fields, validate_ooo_entry};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rollcall: who on the team is reachable on a given day.
//!
//! The [`Roster`] service ties together the member directory, the holiday
//! catalog, the out-of-office ledger, and the history log, all persisted
//! through a [`rollcall_persistence::RecordStore`]. Holiday data comes from a
//! [`HolidayOracle`]; country and region names are mapped to the oracle's
//! codes by a [`CountryDirectory`].

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
#![allow(clippy::multiple_crate_versions)]

mod catalog;
mod clock;
mod directory;
mod error;
pub mod history;
mod oracle;
mod roster;

#[cfg(test)]
mod tests;

pub use catalog::{GenerationReport, HolidaySource};
pub use clock::{Clock, SystemClock};
pub use directory::{CountryDirectory, CountryEntry};
pub use error::CoreError;
pub use oracle::{DEFAULT_HOLIDAY_API, HolidayOracle, NagerOracle, OracleError};
pub use roster::{MemberAvailability, MemberLocations, MonthAvailability, OooDetails, Roster};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability resolution.
//!
//! Combines the holiday catalog and the out-of-office ledger into one
//! verdict per member and day. Evaluation order is fixed:
//!
//! 1. Holiday for the member's country/region
//! 2. Out-of-office interval covering the day
//! 3. Available
//!
//! A holiday always wins over an out-of-office interval on the same day.

use crate::error::DomainError;
use crate::holidays::HolidayCalendar;
use crate::ooo::OooLedger;
use crate::types::{CalendarDate, Member, MemberDirectory, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Verdict for one member on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether the member is reachable.
    pub available: bool,
    /// Why the member is unavailable; `None` when available.
    pub reason: Option<String>,
}

impl Availability {
    /// An available verdict.
    #[must_use]
    pub const fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    /// An unavailable verdict with a reason.
    #[must_use]
    pub const fn unavailable(reason: String) -> Self {
        Self {
            available: false,
            reason: Some(reason),
        }
    }
}

/// Resolves whether a member is available on `date`.
///
/// # Arguments
///
/// * `member_id` - The member's id, used for the out-of-office lookup
/// * `member` - The member, used for the country/region holiday lookup
/// * `date` - The day to resolve
/// * `holidays` - The holiday catalog
/// * `ooo` - The out-of-office ledger
#[must_use]
pub fn resolve(
    member_id: &MemberId,
    member: &Member,
    date: &CalendarDate,
    holidays: &HolidayCalendar,
    ooo: &OooLedger,
) -> Availability {
    let region: Option<&str> = member.region();

    if holidays.is_holiday(date, &member.country, region) {
        let name: &str = holidays
            .holiday_name(date, &member.country, region)
            .unwrap_or_default();
        return Availability::unavailable(format!("Holiday: {name}"));
    }

    if let Some(entry) = ooo.covering_entry(member_id, date) {
        return Availability::unavailable(format!("OOO: {}", entry.reason));
    }

    Availability::available()
}

/// Per-member verdicts for one day.
pub type DayAvailability = BTreeMap<MemberId, Availability>;

/// Resolves every member on every day of a month.
///
/// # Errors
///
/// Returns an error if `month` is not between 1 and 12.
pub fn resolve_month(
    year: i32,
    month: u8,
    members: &MemberDirectory,
    holidays: &HolidayCalendar,
    ooo: &OooLedger,
) -> Result<BTreeMap<CalendarDate, DayAvailability>, DomainError> {
    let days: Vec<CalendarDate> = days_in_month(year, month)?;

    Ok(days
        .into_iter()
        .map(|date| {
            let verdicts: DayAvailability = members
                .iter()
                .map(|(id, member)| (id.clone(), resolve(id, member, &date, holidays, ooo)))
                .collect();
            (date, verdicts)
        })
        .collect())
}

/// Returns every day of the given month in order.
///
/// # Errors
///
/// Returns an error if `month` is not between 1 and 12 or the year is out of range.
pub fn days_in_month(year: i32, month: u8) -> Result<Vec<CalendarDate>, DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidMonth(month));
    }
    let first: CalendarDate = CalendarDate::from_ymd(year, month, 1)?;

    let mut days: Vec<CalendarDate> = Vec::with_capacity(31);
    let mut cursor: Option<CalendarDate> = Some(first);
    while let Some(day) = cursor {
        if u8::from(day.date().month()) != month {
            break;
        }
        days.push(day);
        cursor = day.next_day();
    }
    Ok(days)
}

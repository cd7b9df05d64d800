// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ooo::OooEntry;
use crate::types::Member;

/// Validates a member's required fields.
///
/// # Errors
///
/// Returns an error if the name or country is empty.
pub fn validate_member_fields(member: &Member) -> Result<(), DomainError> {
    if member.name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    if member.country.trim().is_empty() {
        return Err(DomainError::InvalidCountry(String::from(
            "Country cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a holiday name before a manual insert.
///
/// # Errors
///
/// Returns an error if the name is empty.
pub fn validate_holiday_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidHolidayName(String::from(
            "Holiday name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a new out-of-office interval against the member's existing ones.
///
/// This is the single admission point for out-of-office intervals. Overlapping
/// and duplicate intervals are currently accepted. The member's existing
/// intervals are passed in so a stricter policy can be applied here without
/// touching callers.
///
/// # Errors
///
/// Returns an error if the interval ends before it starts.
pub fn validate_ooo_entry(_existing: &[OooEntry], candidate: &OooEntry) -> Result<(), DomainError> {
    if candidate.end_date < candidate.start_date {
        return Err(DomainError::InvalidDateRange {
            start: candidate.start_date,
            end: candidate.end_date,
        });
    }
    Ok(())
}

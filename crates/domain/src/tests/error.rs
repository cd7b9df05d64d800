// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CalendarDate, DomainError};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid name: test");

    let err: DomainError = DomainError::InvalidCountry(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid country: test");

    let err: DomainError = DomainError::InvalidHolidayName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid holiday name: test");

    let err: DomainError = DomainError::DateParseError {
        date_string: String::from("2025-13-01"),
        error: String::from("bad month"),
    };
    assert_eq!(
        format!("{err}"),
        "Failed to parse date '2025-13-01': bad month"
    );

    let err: DomainError = DomainError::InvalidCalendarDate {
        year: 2025,
        month: 2,
        day: 30,
    };
    assert_eq!(format!("{err}"), "Invalid calendar date: 2025-02-30");

    let start: CalendarDate = CalendarDate::from_ymd(2025, 3, 10).unwrap();
    let end: CalendarDate = CalendarDate::from_ymd(2025, 3, 1).unwrap();
    let err: DomainError = DomainError::InvalidDateRange { start, end };
    assert_eq!(
        format!("{err}"),
        "Invalid date range: 2025-03-01 is before 2025-03-10"
    );

    let err: DomainError = DomainError::InvalidMonth(0);
    assert_eq!(
        format!("{err}"),
        "Invalid month: 0. Must be between 1 and 12"
    );
}

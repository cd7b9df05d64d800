// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CalendarDate, DomainError, Member, MemberDirectory, MemberId};

#[test]
fn test_calendar_date_parses_and_renders_iso() {
    let date: CalendarDate = "2025-07-04".parse().unwrap();
    assert_eq!(date.year(), 2025);
    assert_eq!(date.to_string(), "2025-07-04");
}

#[test]
fn test_calendar_date_rejects_garbage() {
    let result: Result<CalendarDate, DomainError> = "07/04/2025".parse();
    assert!(matches!(
        result,
        Err(DomainError::DateParseError { date_string, .. }) if date_string == "07/04/2025"
    ));
}

#[test]
fn test_calendar_date_from_ymd_rejects_impossible_day() {
    assert_eq!(
        CalendarDate::from_ymd(2025, 2, 29),
        Err(DomainError::InvalidCalendarDate {
            year: 2025,
            month: 2,
            day: 29
        })
    );
}

#[test]
fn test_inclusive_days_until() {
    let start: CalendarDate = "2025-02-01".parse().unwrap();
    let end: CalendarDate = "2025-02-05".parse().unwrap();
    assert_eq!(start.inclusive_days_until(&end), 5);
    assert_eq!(start.inclusive_days_until(&start), 1);
    assert_eq!(end.inclusive_days_until(&start), 0);
}

#[test]
fn test_member_id_assigned_from_count() {
    assert_eq!(MemberId::next_for_count(0), MemberId::new("1"));
    assert_eq!(MemberId::next_for_count(9).value(), "10");
}

#[test]
fn test_member_ids_order_numerically() {
    let mut ids: Vec<MemberId> = vec![
        MemberId::new("10"),
        MemberId::new("2"),
        MemberId::new("legacy"),
        MemberId::new("1"),
    ];
    ids.sort();

    let rendered: Vec<&str> = ids.iter().map(MemberId::value).collect();
    assert_eq!(rendered, vec!["1", "2", "10", "legacy"]);
}

#[test]
fn test_member_blank_region_is_none() {
    let member: Member = Member::new(" Alice ", "United States", Some("  "));
    assert_eq!(member.name, "Alice");
    assert_eq!(member.region(), None);
}

#[test]
fn test_member_document_accepts_empty_region_string() {
    let raw: &str = r#"{
        "1": {"name": "Alice", "country": "United States", "region": ""},
        "2": {"name": "Bob", "country": "Australia", "region": "Victoria"},
        "3": {"name": "Chen", "country": "China"}
    }"#;

    let members: MemberDirectory = serde_json::from_str(raw).unwrap();

    assert_eq!(members[&MemberId::new("1")].region(), None);
    assert_eq!(members[&MemberId::new("2")].region(), Some("Victoria"));
    assert_eq!(members[&MemberId::new("3")].region(), None);
}

#[test]
fn test_member_without_region_serializes_empty_string() {
    let member: Member = Member::new("Alice", "United States", None);
    let value: serde_json::Value = serde_json::to_value(&member).unwrap();
    assert_eq!(value["region"], "");
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Out-of-office ledger.
//!
//! Each member owns an ordered list of inclusive date intervals. The list is
//! kept in insertion order and may contain overlapping or duplicate ranges.
//! A member whose list becomes empty is removed from the ledger.

use crate::types::{CalendarDate, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reason recorded when none is supplied.
pub const DEFAULT_OOO_REASON: &str = "Vacation";

/// An inclusive out-of-office interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OooEntry {
    /// First day away.
    pub start_date: CalendarDate,
    /// Last day away.
    pub end_date: CalendarDate,
    /// Why the member is away.
    pub reason: String,
}

impl OooEntry {
    /// Creates a new `OooEntry`.
    ///
    /// A blank reason is replaced by [`DEFAULT_OOO_REASON`].
    #[must_use]
    pub fn new(start_date: CalendarDate, end_date: CalendarDate, reason: Option<&str>) -> Self {
        let reason: String = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_OOO_REASON)
            .to_string();
        Self {
            start_date,
            end_date,
            reason,
        }
    }

    /// Returns true if `date` falls within the interval, both ends included.
    #[must_use]
    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start_date <= *date && *date <= self.end_date
    }

    /// Returns true if the interval has exactly these endpoints.
    #[must_use]
    pub fn matches_range(&self, start: &CalendarDate, end: &CalendarDate) -> bool {
        self.start_date == *start && self.end_date == *end
    }

    /// Length of the interval in days, both ends included.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        self.start_date.inclusive_days_until(&self.end_date)
    }

    /// True for a single-day interval.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}

/// The `ooo` record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OooLedger(BTreeMap<MemberId, Vec<OooEntry>>);

impl OooLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the intervals stored for a member, in stored order.
    #[must_use]
    pub fn entries_for(&self, member_id: &MemberId) -> &[OooEntry] {
        self.0.get(member_id).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the member has any stored interval.
    #[must_use]
    pub fn has_member(&self, member_id: &MemberId) -> bool {
        self.0.contains_key(member_id)
    }

    /// Appends an interval. Existing intervals are not merged or deduplicated.
    pub fn add(&mut self, member_id: &MemberId, entry: OooEntry) {
        self.0.entry(member_id.clone()).or_default().push(entry);
    }

    /// Returns the first stored interval covering `date`.
    #[must_use]
    pub fn covering_entry(&self, member_id: &MemberId, date: &CalendarDate) -> Option<&OooEntry> {
        self.entries_for(member_id)
            .iter()
            .find(|entry| entry.contains(date))
    }

    /// Returns true iff any stored interval for the member covers `date`.
    #[must_use]
    pub fn is_out_of_office(&self, member_id: &MemberId, date: &CalendarDate) -> bool {
        self.covering_entry(member_id, date).is_some()
    }

    /// Removes the first interval (in stored order) covering `date`.
    pub fn remove_by_date(&mut self, member_id: &MemberId, date: &CalendarDate) -> Option<OooEntry> {
        self.remove_first(member_id, |entry| entry.contains(date))
    }

    /// Removes the first interval whose endpoints equal `start` and `end`.
    pub fn cancel_by_range(
        &mut self,
        member_id: &MemberId,
        start: &CalendarDate,
        end: &CalendarDate,
    ) -> Option<OooEntry> {
        self.remove_first(member_id, |entry| entry.matches_range(start, end))
    }

    fn remove_first<F>(&mut self, member_id: &MemberId, predicate: F) -> Option<OooEntry>
    where
        F: Fn(&OooEntry) -> bool,
    {
        let entries: &mut Vec<OooEntry> = self.0.get_mut(member_id)?;
        let removed: Option<OooEntry> = entries
            .iter()
            .position(predicate)
            .map(|index| entries.remove(index));

        if entries.is_empty() {
            self.0.remove(member_id);
        }
        removed
    }
}

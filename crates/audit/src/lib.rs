// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! History log types.
//!
//! Every mutating roster operation appends exactly one [`HistoryEntry`].
//! Entries are immutable once written: the log is only ever appended to,
//! never edited or pruned. Storage order is insertion order; presentation
//! order is newest first (see [`list_recent`]).

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use rollcall_domain::MemberId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Member name recorded for operations not tied to a member.
pub const SYSTEM_ACTOR: &str = "System";

/// Member name recorded when a member id cannot be resolved.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// Timestamp layout. Lexicographic order equals chronological order.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// The kind of operation an entry records.
///
/// Unrecognised operation names read from storage are preserved verbatim
/// in [`OperationType::Other`] so that re-saving the log never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationType {
    /// A member was added to the roster.
    AddMember,
    /// A holiday was added manually.
    AddHoliday,
    /// The holiday catalog was regenerated from the roster.
    GenerateHolidays,
    /// An out-of-office interval was added.
    AddOoo,
    /// An out-of-office interval was removed by date.
    DeleteOoo,
    /// An out-of-office interval was canceled by exact range.
    CancelVacation,
    /// Any other operation name.
    Other(String),
}

impl OperationType {
    /// Returns the stored name of this operation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AddMember => "ADD_MEMBER",
            Self::AddHoliday => "ADD_HOLIDAY",
            Self::GenerateHolidays => "GENERATE_HOLIDAYS",
            Self::AddOoo => "ADD_OOO",
            Self::DeleteOoo => "DELETE_OOO",
            Self::CancelVacation => "CANCEL_VACATION",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for OperationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ADD_MEMBER" => Self::AddMember,
            "ADD_HOLIDAY" => Self::AddHoliday,
            "GENERATE_HOLIDAYS" => Self::GenerateHolidays,
            "ADD_OOO" => Self::AddOoo,
            "DELETE_OOO" => Self::DeleteOoo,
            "CANCEL_VACATION" => Self::CancelVacation,
            _ => Self::Other(value),
        }
    }
}

impl From<OperationType> for String {
    fn from(value: OperationType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the `history` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the operation happened, as `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// What kind of operation this was.
    pub operation_type: OperationType,
    /// The member the operation concerned, if any.
    pub member_id: Option<MemberId>,
    /// The member's name at the time of the operation.
    pub member_name: Option<String>,
    /// Human-readable description of the change.
    pub details: String,
}

impl HistoryEntry {
    /// Creates a new `HistoryEntry`.
    ///
    /// Once created, an entry is never modified.
    ///
    /// # Arguments
    ///
    /// * `at` - When the operation happened
    /// * `operation_type` - The kind of operation
    /// * `member_id` - The member concerned, if any
    /// * `member_name` - The member's resolved name, if any
    /// * `details` - Description of the change
    #[must_use]
    pub fn new(
        at: OffsetDateTime,
        operation_type: OperationType,
        member_id: Option<MemberId>,
        member_name: Option<String>,
        details: String,
    ) -> Self {
        Self {
            timestamp: format_timestamp(at),
            operation_type,
            member_id,
            member_name,
            details,
        }
    }
}

/// Renders a timestamp in the stored history layout.
///
/// Falls back to the Unix timestamp if formatting fails.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// Returns the log ordered newest first.
///
/// The sort is stable, so entries sharing a timestamp keep their
/// relative insertion order.
#[must_use]
pub fn list_recent(entries: &[HistoryEntry]) -> Vec<HistoryEntry> {
    let mut sorted: Vec<HistoryEntry> = entries.to_vec();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

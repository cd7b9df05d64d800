// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::Value;

/// The four persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// The holiday catalog.
    Holidays,
    /// The member directory.
    Members,
    /// The out-of-office ledger.
    Ooo,
    /// The history log.
    History,
}

impl RecordKey {
    /// Every record, in migration order.
    pub const ALL: [Self; 4] = [Self::Holidays, Self::Members, Self::Ooo, Self::History];

    /// Returns the record's storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Holidays => "holidays",
            Self::Members => "members",
            Self::Ooo => "ooo",
            Self::History => "history",
        }
    }

    /// Returns the file or object name the record is stored under.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Maps a file or object name back to its record, if it names one.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem: &str = name.strip_suffix(".json")?;
        stem.parse().ok()
    }

    /// The document a record holds before anything has been written.
    #[must_use]
    pub fn default_document(self) -> Value {
        match self {
            Self::Holidays => serde_json::json!({ "national": {}, "regional": {} }),
            Self::Members | Self::Ooo => serde_json::json!({}),
            Self::History => serde_json::json!([]),
        }
    }

    pub(crate) const fn lock_index(self) -> usize {
        match self {
            Self::Holidays => 0,
            Self::Members => 1,
            Self::Ooo => 2,
            Self::History => 3,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown record: {s}"))
    }
}

/// Sorts keys lexicographically by storage name.
pub(crate) fn sort_keys(keys: &mut [RecordKey]) {
    keys.sort_by_key(|key| key.as_str());
}

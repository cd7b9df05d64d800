// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::DomainError;
use rollcall_persistence::PersistenceError;

/// Errors that can occur during roster operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    Domain(DomainError),
    /// A record could not be written.
    Storage(PersistenceError),
    /// No member has the given id.
    MemberNotFound(String),
    /// No out-of-office interval matched.
    OooNotFound {
        /// The member searched.
        member_id: String,
        /// The date searched.
        date: String,
    },
    /// Holiday generation needs at least one member.
    NoMembers,
    /// Holiday generation needs at least one member with a country.
    NoCountries,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "Storage failure: {err}"),
            Self::MemberNotFound(id) => write!(f, "Member not found: {id}"),
            Self::OooNotFound { member_id, date } => {
                write!(f, "No OOO entry found for member {member_id} on {date}")
            }
            Self::NoMembers => write!(f, "No members found. Add team members first."),
            Self::NoCountries => write!(f, "No countries found in member data"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Storage(err)
    }
}

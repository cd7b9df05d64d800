// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_audit::{HistoryEntry, OperationType, UNKNOWN_MEMBER};
use rollcall_domain::MemberId;
use rollcall_persistence::RecordStore;
use tracing::debug;

use crate::clock::Clock;
use crate::error::CoreError;

/// Appends one entry to the history log.
///
/// When `member_name` is absent but `member_id` is present, the name is
/// looked up in the member directory at write time, falling back to
/// [`UNKNOWN_MEMBER`].
///
/// # Errors
///
/// Returns an error if the history record cannot be saved.
pub fn append(
    store: &RecordStore,
    clock: &dyn Clock,
    operation_type: OperationType,
    member_id: Option<&MemberId>,
    details: String,
    member_name: Option<&str>,
) -> Result<(), CoreError> {
    let member_name: Option<String> = match (member_name, member_id) {
        (Some(name), _) => Some(name.to_string()),
        (None, Some(id)) => Some(
            store
                .members()
                .get(id)
                .map_or_else(|| UNKNOWN_MEMBER.to_string(), |m| m.name.clone()),
        ),
        (None, None) => None,
    };

    debug!(operation = %operation_type, member_id = ?member_id, "Recording history");
    let entry: HistoryEntry = HistoryEntry::new(
        clock.now(),
        operation_type,
        member_id.cloned(),
        member_name,
        details,
    );
    store.append_history(entry)?;
    Ok(())
}

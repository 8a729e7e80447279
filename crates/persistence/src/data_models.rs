// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::Date;
use withdrawal_gate_domain::{RestrictionReason, UserWithdrawalState};

use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A user as listed by the administrator directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The user identifier.
    pub user_id: i64,
    /// The display name.
    pub display_name: String,
    /// Restriction and withdrawal history.
    pub withdrawal: UserWithdrawalState,
}

/// Formats a calendar date for storage.
pub(crate) fn format_date(date: Date) -> String {
    date.to_string()
}

/// Parses a stored calendar date.
pub(crate) fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(
        value,
        &time::format_description::well_known::Iso8601::DEFAULT,
    )
    .map_err(|e| PersistenceError::ReconstructionError(format!("Invalid date '{value}': {e}")))
}

/// Rebuilds a user's withdrawal state from its stored columns.
pub(crate) fn reconstruct_withdrawal_state(
    restriction_reason: Option<&str>,
    last_withdrawal_date: Option<&str>,
) -> Result<UserWithdrawalState, PersistenceError> {
    let restriction: Option<RestrictionReason> = restriction_reason
        .map(RestrictionReason::new)
        .transpose()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
    let last_withdrawal_date: Option<Date> = last_withdrawal_date.map(parse_date).transpose()?;

    Ok(UserWithdrawalState {
        restriction,
        last_withdrawal_date,
    })
}

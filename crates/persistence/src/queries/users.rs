// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use withdrawal_gate_domain::UserWithdrawalState;

use crate::data_models::{UserRecord, reconstruct_withdrawal_state};
use crate::diesel_schema::{user_withdrawal_state, users};
use crate::error::PersistenceError;

/// Returns whether a user exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn user_exists(conn: &mut SqliteConnection, user_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = users::table
        .filter(users::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Loads a user's withdrawal state.
///
/// A user without a state row has the default state.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the user does not exist.
pub fn get_withdrawal_state(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<UserWithdrawalState, PersistenceError> {
    if !user_exists(conn, user_id)? {
        return Err(PersistenceError::UserNotFound(user_id));
    }

    let row: Option<(Option<String>, Option<String>)> = user_withdrawal_state::table
        .filter(user_withdrawal_state::user_id.eq(user_id))
        .select((
            user_withdrawal_state::restriction_reason,
            user_withdrawal_state::last_withdrawal_date,
        ))
        .first::<(Option<String>, Option<String>)>(conn)
        .optional()?;

    row.map_or_else(
        || Ok(UserWithdrawalState::new()),
        |(reason, last)| reconstruct_withdrawal_state(reason.as_deref(), last.as_deref()),
    )
}

/// Lists users in id order, optionally filtered by restriction status.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `restricted` - `Some(true)` for restricted users only, `Some(false)`
///   for unrestricted users only, `None` for everyone
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_users(
    conn: &mut SqliteConnection,
    restricted: Option<bool>,
) -> Result<Vec<UserRecord>, PersistenceError> {
    let mut query = users::table
        .left_join(user_withdrawal_state::table)
        .select((
            users::user_id,
            users::display_name,
            user_withdrawal_state::restriction_reason.nullable(),
            user_withdrawal_state::last_withdrawal_date.nullable(),
        ))
        .order(users::user_id.asc())
        .into_boxed();

    match restricted {
        Some(true) => {
            query = query.filter(user_withdrawal_state::restriction_reason.is_not_null());
        }
        Some(false) => {
            query = query.filter(user_withdrawal_state::restriction_reason.is_null());
        }
        None => {}
    }

    let rows: Vec<(i64, String, Option<String>, Option<String>)> = query.load(conn)?;

    rows.into_iter()
        .map(|(user_id, display_name, reason, last)| {
            Ok(UserRecord {
                user_id,
                display_name,
                withdrawal: reconstruct_withdrawal_state(reason.as_deref(), last.as_deref())?,
            })
        })
        .collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use withdrawal_gate_domain::{RestrictionReason, UserWithdrawalState};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_date;
use crate::diesel_schema::{user_withdrawal_state, users};
use crate::error::PersistenceError;

/// Inserts a user and returns the assigned identifier.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    display_name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(users::table)
        .values(users::display_name.eq(display_name))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Writes a user's withdrawal state, creating the row on first write.
///
/// # Errors
///
/// Returns an error if the upsert fails, including when the user does not
/// exist (foreign key violation).
pub fn write_withdrawal_state(
    conn: &mut SqliteConnection,
    user_id: i64,
    state: &UserWithdrawalState,
) -> Result<(), PersistenceError> {
    let reason: Option<&str> = state.restriction.as_ref().map(RestrictionReason::value);
    let last: Option<String> = state.last_withdrawal_date.map(format_date);

    diesel::insert_into(user_withdrawal_state::table)
        .values((
            user_withdrawal_state::user_id.eq(user_id),
            user_withdrawal_state::restriction_reason.eq(reason),
            user_withdrawal_state::last_withdrawal_date.eq(&last),
        ))
        .on_conflict(user_withdrawal_state::user_id)
        .do_update()
        .set((
            user_withdrawal_state::restriction_reason.eq(reason),
            user_withdrawal_state::last_withdrawal_date.eq(&last),
            user_withdrawal_state::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    Ok(())
}

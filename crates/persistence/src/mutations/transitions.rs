// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional persistence of core transitions.
//!
//! A transition's state change and its audit event are written in one
//! transaction: either both are stored or neither is.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use withdrawal_gate::{ScheduleTransition, TransitionResult};
use withdrawal_gate_audit::AuditEvent;

use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::schedule::replace_schedule;
use crate::mutations::users::{create_user, write_withdrawal_state};
use crate::queries::users::user_exists;

/// Persists a schedule replacement and its audit event.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns an error if the stored version does not precede the new one or
/// any write fails. Nothing is written on error.
pub fn persist_schedule_transition(
    conn: &mut SqliteConnection,
    transition: &ScheduleTransition,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        replace_schedule(conn, &transition.new_snapshot)?;
        let event_id: i64 = persist_audit_event(conn, &transition.audit_event)?;
        debug!(
            event_id,
            version = transition.new_snapshot.version,
            "Persisted schedule transition"
        );
        Ok(event_id)
    })
}

/// Persists a user state change and its audit event.
///
/// # Returns
///
/// The audit event ID.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the user does not exist, or
/// an error if any write fails. Nothing is written on error.
pub fn persist_user_transition(
    conn: &mut SqliteConnection,
    transition: &TransitionResult,
) -> Result<i64, PersistenceError> {
    let user_id: i64 = transition.new_state.user_id;

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        if !user_exists(conn, user_id)? {
            return Err(PersistenceError::UserNotFound(user_id));
        }
        write_withdrawal_state(conn, user_id, &transition.new_state.withdrawal)?;
        let event_id: i64 = persist_audit_event(conn, &transition.audit_event)?;
        debug!(event_id, user_id, "Persisted user transition");
        Ok(event_id)
    })
}

/// Registers a user and records the registration in the audit log.
///
/// `build_event` receives the new user identifier and returns the event to
/// store with it.
///
/// # Returns
///
/// The new user ID and the audit event ID.
///
/// # Errors
///
/// Returns an error if either insert fails. Nothing is written on error.
pub fn persist_user_registration<F>(
    conn: &mut SqliteConnection,
    display_name: &str,
    build_event: F,
) -> Result<(i64, i64), PersistenceError>
where
    F: FnOnce(i64) -> AuditEvent,
{
    conn.transaction::<(i64, i64), PersistenceError, _>(|conn| {
        let user_id: i64 = create_user(conn, display_name)?;
        let event_id: i64 = persist_audit_event(conn, &build_event(user_id))?;
        debug!(event_id, user_id, "Persisted user registration");
        Ok((user_id, event_id))
    })
}

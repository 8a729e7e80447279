// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the withdrawal gate.
//!
//! Stores the global schedule, the user directory, per-user withdrawal
//! state and the audit trail in `SQLite` via Diesel.
//!
//! ## Tables
//!
//! - `withdrawal_schedule` - a single row, versioned
//! - `users` - the user directory
//! - `user_withdrawal_state` - written on first change; absence means the
//!   default state
//! - `audit_events` - append-only, one row per accepted state change
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use withdrawal_gate::{ScheduleSnapshot, ScheduleTransition, TransitionResult};
use withdrawal_gate_audit::AuditEvent;
use withdrawal_gate_domain::UserWithdrawalState;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::UserRecord;
pub use error::PersistenceError;

/// Persistence adapter over a single `SQLite` connection.
///
/// Every constructor runs migrations, verifies foreign key enforcement and
/// seeds the default schedule if none is stored.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter with a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:withdrawal_gate_memdb_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        Self::from_connection(conn)
    }

    /// Creates a persistence adapter backed by a database file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: SqliteConnection) -> Result<Self, PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;
        mutations::schedule::load_or_seed_schedule(&mut conn)?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Schedule
    // ========================================================================

    /// Loads the current schedule snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn load_schedule(&mut self) -> Result<ScheduleSnapshot, PersistenceError> {
        mutations::schedule::load_or_seed_schedule(&mut self.conn)
    }

    /// Persists a schedule replacement together with its audit event.
    ///
    /// # Returns
    ///
    /// The audit event ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ScheduleVersionConflict` if the stored
    /// schedule is not the one the transition was computed from.
    pub fn persist_schedule_transition(
        &mut self,
        transition: &ScheduleTransition,
    ) -> Result<i64, PersistenceError> {
        mutations::transitions::persist_schedule_transition(&mut self.conn, transition)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Registers a user together with the audit event built for it.
    ///
    /// # Returns
    ///
    /// The new user ID and the audit event ID.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails. Nothing is written on error.
    pub fn register_user<F>(
        &mut self,
        display_name: &str,
        build_event: F,
    ) -> Result<(i64, i64), PersistenceError>
    where
        F: FnOnce(i64) -> AuditEvent,
    {
        mutations::transitions::persist_user_registration(
            &mut self.conn,
            display_name,
            build_event,
        )
    }

    /// Returns whether a user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_exists(&mut self, user_id: i64) -> Result<bool, PersistenceError> {
        queries::users::user_exists(&mut self.conn, user_id)
    }

    /// Loads a user's withdrawal state, defaulting when none is stored.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if the user does not exist.
    pub fn get_withdrawal_state(
        &mut self,
        user_id: i64,
    ) -> Result<UserWithdrawalState, PersistenceError> {
        queries::users::get_withdrawal_state(&mut self.conn, user_id)
    }

    /// Lists users, optionally filtered by restriction status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(
        &mut self,
        restricted: Option<bool>,
    ) -> Result<Vec<UserRecord>, PersistenceError> {
        queries::users::list_users(&mut self.conn, restricted)
    }

    /// Persists a user state change together with its audit event.
    ///
    /// # Returns
    ///
    /// The audit event ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or a write fails.
    pub fn persist_user_transition(
        &mut self,
        transition: &TransitionResult,
    ) -> Result<i64, PersistenceError> {
        mutations::transitions::persist_user_transition(&mut self.conn, transition)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit timeline, optionally for a single user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_timeline(
        &mut self,
        user_id: Option<i64>,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, user_id)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ApiError;

type LockTable = HashMap<i64, Arc<Mutex<()>>>;

fn table_poisoned() -> ApiError {
    ApiError::Internal {
        message: String::from("User lock table poisoned"),
    }
}

/// One mutex per user, created on first use and removed when the last
/// holder lets go.
///
/// Holding a user's mutex serializes every read-evaluate-write sequence for
/// that user. Different users never share a mutex. The table only holds
/// entries for users with a request in flight.
#[derive(Debug, Default)]
pub struct UserLocks {
    table: Mutex<LockTable>,
}

impl UserLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle on the mutex for `user_id`, creating it if needed.
    ///
    /// The table lock is released before the caller locks the returned
    /// handle, so waiting on one user never blocks lookups for another.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the table lock is poisoned.
    pub fn for_user(&self, user_id: i64) -> Result<UserLockHandle<'_>, ApiError> {
        let mut table: MutexGuard<'_, LockTable> =
            self.table.lock().map_err(|_| table_poisoned())?;
        let lock: Arc<Mutex<()>> = Arc::clone(table.entry(user_id).or_default());
        drop(table);

        Ok(UserLockHandle {
            locks: self,
            user_id,
            lock,
        })
    }

    /// Returns how many users currently have an entry in the table.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the table lock is poisoned.
    pub fn tracked_users(&self) -> Result<usize, ApiError> {
        Ok(self.table.lock().map_err(|_| table_poisoned())?.len())
    }
}

/// A claim on one user's mutex.
///
/// Dropping the last handle for a user removes that user's entry from the
/// table.
#[derive(Debug)]
pub struct UserLockHandle<'a> {
    locks: &'a UserLocks,
    user_id: i64,
    lock: Arc<Mutex<()>>,
}

impl UserLockHandle<'_> {
    /// Blocks until this user's mutex is held.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the user's mutex is poisoned.
    pub fn lock(&self) -> Result<MutexGuard<'_, ()>, ApiError> {
        self.lock.lock().map_err(|_| ApiError::Internal {
            message: format!("Lock for user {} poisoned", self.user_id),
        })
    }
}

impl Drop for UserLockHandle<'_> {
    fn drop(&mut self) {
        // New handles are only created under the table lock, so a count of
        // two here (the table and this handle) cannot grow before removal.
        if let Ok(mut table) = self.locks.table.lock()
            && table
                .get(&self.user_id)
                .is_some_and(|entry| Arc::ptr_eq(entry, &self.lock))
            && Arc::strong_count(&self.lock) == 2
        {
            table.remove(&self.user_id);
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use withdrawal_gate_audit::{AuditEvent, StateSnapshot};
use withdrawal_gate_domain::{UserWithdrawalState, WithdrawalSchedule};

/// An immutable, versioned view of the global schedule.
///
/// A new snapshot is produced for every accepted replacement; snapshots are
/// never modified in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    /// Monotonically increasing version, starting at 1.
    pub version: i64,
    /// The schedule in force.
    pub schedule: WithdrawalSchedule,
}

impl ScheduleSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(version: i64, schedule: WithdrawalSchedule) -> Self {
        Self { version, schedule }
    }

    /// The snapshot in force before any administrator change.
    #[must_use]
    pub fn initial() -> Self {
        Self::new(1, WithdrawalSchedule::default())
    }

    /// Converts the snapshot to an audit snapshot.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!("version={},schedule={}", self.version, self.schedule))
    }
}

impl Default for ScheduleSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// The withdrawal state of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    /// The user this state belongs to.
    pub user_id: i64,
    /// Restriction and withdrawal history.
    pub withdrawal: UserWithdrawalState,
}

impl UserState {
    /// Creates a user state.
    #[must_use]
    pub const fn new(user_id: i64, withdrawal: UserWithdrawalState) -> Self {
        Self {
            user_id,
            withdrawal,
        }
    }

    /// Converts the state to an audit snapshot.
    ///
    /// The restriction reason is included; payout details never are.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let last: String = self
            .withdrawal
            .last_withdrawal_date
            .map_or_else(|| String::from("none"), |date| date.to_string());
        StateSnapshot::new(format!(
            "user_id={},restricted={},reason={},last_withdrawal={last}",
            self.user_id,
            self.withdrawal.is_restricted(),
            self.withdrawal.restriction_reason().unwrap_or("none"),
        ))
    }
}

/// The result of a successful user-scoped transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: UserState,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of replacing the global schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTransition {
    /// The snapshot to publish.
    pub new_snapshot: ScheduleSnapshot,
    /// The audit event recording this replacement.
    pub audit_event: AuditEvent,
}

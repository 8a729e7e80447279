// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;
use withdrawal_gate_domain::{RestrictionReason, WithdrawalRequest, WithdrawalSchedule};

/// A command represents administrator or user intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the global withdrawal schedule wholesale.
    SetSchedule {
        /// The validated replacement schedule.
        schedule: WithdrawalSchedule,
    },
    /// Set or lift a user's manual restriction.
    SetRestriction {
        /// The restriction to set; `None` lifts it.
        restriction: Option<RestrictionReason>,
    },
    /// Record an accepted withdrawal.
    RecordWithdrawal {
        /// The business date of the withdrawal.
        date: Date,
        /// The shape-validated request.
        request: WithdrawalRequest,
    },
}

impl Command {
    /// Returns the action name recorded in the audit trail.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetSchedule { .. } => "SetSchedule",
            Self::SetRestriction { .. } => "SetRestriction",
            Self::RecordWithdrawal { .. } => "RecordWithdrawal",
        }
    }
}

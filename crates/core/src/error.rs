// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use withdrawal_gate_domain::{Decision, DomainError};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// A withdrawal was submitted on a day the evaluator does not allow.
    #[error("Withdrawal not permitted: {}", .decision.reason_code)]
    NotEligible {
        /// The decision that refused the withdrawal.
        decision: Decision,
    },
    /// The command was applied to the wrong kind of state.
    #[error("Command {command} cannot be applied to {scope} state")]
    WrongScope {
        /// The command name.
        command: &'static str,
        /// The state it was applied to.
        scope: &'static str,
    },
}

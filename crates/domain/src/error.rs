// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// A single rule violated by a schedule submitted by an administrator.
///
/// Schedule validation reports every violated rule, not just the first one,
/// so the administrator can correct the form in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    /// The schedule type is not one of the known modes.
    #[error("Unknown schedule type '{0}'. Must be 'daysOfWeek' or 'interval'")]
    UnknownScheduleType(String),
    /// Days-of-week mode was selected without any days.
    #[error("At least one withdrawal day must be selected")]
    EmptyDaysOfWeek,
    /// A weekday value outside Sunday=0 .. Saturday=6.
    #[error("Invalid weekday value {0}. Must be between 0 (Sunday) and 6 (Saturday)")]
    WeekdayOutOfRange(i64),
    /// Interval mode was selected without an interval.
    #[error("Interval days must be provided for the interval schedule")]
    MissingIntervalDays,
    /// The interval is outside the permitted range.
    #[error("Invalid interval of {0} days. Must be between 1 and 30")]
    IntervalOutOfRange(i64),
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The submitted schedule violated one or more rules.
    #[error("Invalid withdrawal schedule: {}", join_violations(.violations))]
    InvalidSchedule {
        /// Every rule that was violated, in check order.
        violations: Vec<ScheduleViolation>,
    },
    /// A weekday set was constructed without any days.
    #[error("Withdrawal day set cannot be empty")]
    EmptyWeekdaySet,
    /// An interval outside 1..=30 days.
    #[error("Invalid interval of {0} days. Must be between 1 and 30")]
    InvalidIntervalDays(i64),
    /// A weekday number outside 0..=6.
    #[error("Invalid weekday value {0}. Must be between 0 (Sunday) and 6 (Saturday)")]
    InvalidWeekday(i64),
    /// A restriction was requested without a reason.
    #[error("A reason is required when restricting withdrawals")]
    EmptyRestrictionReason,
    /// A bulk restriction was requested for no users.
    #[error("At least one user must be selected")]
    EmptyUserSelection,
    /// A user display name was empty.
    #[error("User name cannot be empty")]
    EmptyUserName,
    /// A withdrawal amount that is not a positive, finite value.
    #[error("Invalid withdrawal amount '{0}'. Must be a positive amount")]
    InvalidAmount(String),
    /// A payout method other than bank or crypto.
    #[error("Unknown payout method '{0}'. Must be 'bank' or 'crypto'")]
    UnknownPayoutMethod(String),
    /// The details block for the selected payout method was absent.
    #[error("Payout details are required for method '{method}'")]
    MissingPayoutDetails {
        /// The selected payout method.
        method: String,
    },
    /// A required payout field was empty.
    #[error("Payout field '{field}' is required")]
    MissingPayoutField {
        /// The wire name of the missing field.
        field: &'static str,
    },
}

fn join_violations(violations: &[ScheduleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}

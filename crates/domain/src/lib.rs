// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod eligibility;
mod error;
mod schedule;
mod types;
mod validation;
mod withdrawal;

#[cfg(test)]
mod tests;

pub use eligibility::{Decision, ReasonCode, evaluate};
pub use error::{DomainError, ScheduleViolation};
pub use schedule::{
    IntervalDays, ScheduleKind, WeekdaySet, WithdrawalSchedule, weekday_from_number, weekday_name,
};
pub use types::{RestrictionReason, UserWithdrawalState};
pub use validation::{
    RestrictionChange, validate_restriction_request, validate_schedule, validate_user_name,
};
pub use withdrawal::{
    BankTransfer, CryptoTransfer, PayoutDestination, WithdrawalAmount, WithdrawalRequest,
    validate_withdrawal_request,
};

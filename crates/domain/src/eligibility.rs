// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Withdrawal eligibility evaluation.
//!
//! `evaluate` is the single source of truth for whether a user may withdraw
//! on a given day. It is used both to display status and to enforce it at
//! submission time.
//!
//! ## Rules (in priority order)
//!
//! 1. A manual restriction blocks withdrawal regardless of schedule.
//! 2. Days-of-week: allowed iff today's weekday is in the set.
//! 3. Interval: allowed iff there is no history, or at least
//!    `interval` whole calendar days have passed since the last withdrawal.
//!
//! All comparisons are on calendar dates, never on instants.

use crate::schedule::{IntervalDays, WeekdaySet, WithdrawalSchedule};
use crate::types::UserWithdrawalState;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Withdrawal is permitted today.
    Allowed,
    /// An administrator has restricted this user.
    ManuallyRestricted,
    /// Today is not one of the scheduled withdrawal days.
    OutsideScheduleDaysOfWeek,
    /// Not enough days have passed since the last withdrawal.
    OutsideScheduleInterval,
}

impl ReasonCode {
    /// Returns the stable string form of this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "Allowed",
            Self::ManuallyRestricted => "ManuallyRestricted",
            Self::OutsideScheduleDaysOfWeek => "OutsideScheduleDaysOfWeek",
            Self::OutsideScheduleInterval => "OutsideScheduleInterval",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of evaluating eligibility for one user on one day.
///
/// `next_eligible_date` equals the evaluated day when withdrawal is allowed,
/// and also when the user is manually restricted, since lifting a
/// restriction has no scheduled date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether a withdrawal may be submitted today.
    pub allowed_today: bool,
    /// Why.
    pub reason_code: ReasonCode,
    /// The earliest date on which withdrawal is expected to be allowed.
    pub next_eligible_date: Date,
}

impl Decision {
    const fn allowed(today: Date) -> Self {
        Self {
            allowed_today: true,
            reason_code: ReasonCode::Allowed,
            next_eligible_date: today,
        }
    }

    const fn denied(reason_code: ReasonCode, next_eligible_date: Date) -> Self {
        Self {
            allowed_today: false,
            reason_code,
            next_eligible_date,
        }
    }

    /// Returns the whole number of calendar days from `today` until the next
    /// eligible date. Zero when allowed or unknown.
    #[must_use]
    pub fn days_until_eligible(&self, today: Date) -> i64 {
        (self.next_eligible_date - today).whole_days().max(0)
    }
}

/// Evaluates whether `state` may withdraw on `today` under `schedule`.
///
/// This function is pure and total: identical inputs always produce the
/// same `Decision`, and every input produces one.
#[must_use]
pub fn evaluate(
    schedule: &WithdrawalSchedule,
    state: &UserWithdrawalState,
    today: Date,
) -> Decision {
    if state.is_restricted() {
        return Decision::denied(ReasonCode::ManuallyRestricted, today);
    }

    match schedule {
        WithdrawalSchedule::DaysOfWeek(days) => evaluate_days_of_week(*days, today),
        WithdrawalSchedule::Interval(interval) => {
            evaluate_interval(*interval, state.last_withdrawal_date, today)
        }
    }
}

fn evaluate_days_of_week(days: WeekdaySet, today: Date) -> Decision {
    if days.contains(today.weekday()) {
        return Decision::allowed(today);
    }

    // The set is non-empty, so a match occurs within the next seven days.
    let next: Date = (1..=7)
        .map(|offset| today.saturating_add(Duration::days(offset)))
        .find(|candidate| days.contains(candidate.weekday()))
        .unwrap_or(today);

    Decision::denied(ReasonCode::OutsideScheduleDaysOfWeek, next)
}

fn evaluate_interval(interval: IntervalDays, last: Option<Date>, today: Date) -> Decision {
    let Some(last) = last else {
        return Decision::allowed(today);
    };

    let elapsed: i64 = (today - last).whole_days();
    let required: i64 = i64::from(interval.days());

    if elapsed >= required {
        Decision::allowed(today)
    } else {
        Decision::denied(
            ReasonCode::OutsideScheduleInterval,
            last.saturating_add(Duration::days(required)),
        )
    }
}

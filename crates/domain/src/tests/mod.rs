// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod eligibility;

use crate::{IntervalDays, RestrictionReason, UserWithdrawalState, WeekdaySet, WithdrawalSchedule};
use time::{Date, Month, Weekday};

/// Tuesday, 2026-03-03.
pub fn tuesday() -> Date {
    Date::from_calendar_date(2026, Month::March, 3).expect("Valid test date")
}

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

pub fn mon_wed_fri() -> WithdrawalSchedule {
    WithdrawalSchedule::DaysOfWeek(
        WeekdaySet::new([Weekday::Monday, Weekday::Wednesday, Weekday::Friday])
            .expect("Valid weekday set"),
    )
}

pub fn every(days: i64) -> WithdrawalSchedule {
    WithdrawalSchedule::Interval(IntervalDays::new(days).expect("Valid interval"))
}

pub fn last_withdrew_on(date: Date) -> UserWithdrawalState {
    UserWithdrawalState::new().with_last_withdrawal(date)
}

pub fn restricted(reason: &str) -> UserWithdrawalState {
    UserWithdrawalState::new()
        .with_restriction(Some(RestrictionReason::new(reason).expect("Valid reason")))
}

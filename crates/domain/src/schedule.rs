// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The global withdrawal schedule.
//!
//! The schedule has exactly two mutually exclusive modes. Each mode carries
//! only its own payload, so "interval set while days-of-week is active"
//! cannot be represented.
//!
//! ## Invariants
//!
//! - A `WeekdaySet` is never empty
//! - An `IntervalDays` is always within `1..=30`
//! - Weekday numbering is Sunday=0 .. Saturday=6

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Weekday;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];

/// Converts a weekday number (Sunday=0 .. Saturday=6) into a `Weekday`.
///
/// # Errors
///
/// Returns `DomainError::InvalidWeekday` if `number` is outside `0..=6`.
pub fn weekday_from_number(number: i64) -> Result<Weekday, DomainError> {
    usize::try_from(number)
        .ok()
        .and_then(|index| ALL_WEEKDAYS.get(index).copied())
        .ok_or(DomainError::InvalidWeekday(number))
}

/// Returns the English display name of a weekday.
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "Sunday",
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
    }
}

/// A non-empty set of weekdays on which withdrawals are permitted.
///
/// Stored as a bitmask where bit `n` is the weekday numbered `n` from Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdaySet {
    mask: u8,
}

impl WeekdaySet {
    /// Creates a weekday set from the given days. Duplicates are collapsed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyWeekdaySet` if no days are given.
    pub fn new<I>(days: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mask: u8 = days
            .into_iter()
            .fold(0_u8, |mask, day| mask | (1 << day.number_days_from_sunday()));

        if mask == 0 {
            return Err(DomainError::EmptyWeekdaySet);
        }

        Ok(Self { mask })
    }

    /// Creates a weekday set from weekday numbers (Sunday=0 .. Saturday=6).
    ///
    /// # Errors
    ///
    /// Returns an error if any number is out of range or the list is empty.
    pub fn from_numbers(numbers: &[i64]) -> Result<Self, DomainError> {
        let days: Vec<Weekday> = numbers
            .iter()
            .map(|n| weekday_from_number(*n))
            .collect::<Result<Vec<Weekday>, DomainError>>()?;
        Self::new(days)
    }

    /// Returns whether `weekday` is a permitted day.
    #[must_use]
    pub const fn contains(&self, weekday: Weekday) -> bool {
        self.mask & (1 << weekday.number_days_from_sunday()) != 0
    }

    /// Returns the permitted days in Sunday-first order.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_WEEKDAYS.into_iter().filter(|day| self.contains(*day))
    }

    /// Returns the permitted days as numbers (Sunday=0), ascending.
    #[must_use]
    pub fn numbers(&self) -> Vec<u8> {
        self.weekdays().map(Weekday::number_days_from_sunday).collect()
    }

    /// Returns the permitted days as display names, Sunday first.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.weekdays().map(|day| weekday_name(day).to_string()).collect()
    }
}

/// Minimum number of days between withdrawals in interval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalDays(u8);

impl IntervalDays {
    /// The smallest permitted interval.
    pub const MIN: u8 = 1;
    /// The largest permitted interval.
    pub const MAX: u8 = 30;

    /// Creates a validated interval.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIntervalDays` if `days` is outside `1..=30`.
    pub fn new(days: i64) -> Result<Self, DomainError> {
        u8::try_from(days)
            .ok()
            .filter(|d| (Self::MIN..=Self::MAX).contains(d))
            .map(Self)
            .ok_or(DomainError::InvalidIntervalDays(days))
    }

    /// Returns the interval in days.
    #[must_use]
    pub const fn days(&self) -> u8 {
        self.0
    }
}

/// The two schedule modes, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleKind {
    /// Withdrawals permitted only on designated weekdays.
    DaysOfWeek,
    /// Withdrawals permitted only after a minimum number of days.
    Interval,
}

impl ScheduleKind {
    /// Returns the wire representation used by the admin API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DaysOfWeek => "daysOfWeek",
            Self::Interval => "interval",
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daysOfWeek" => Ok(Self::DaysOfWeek),
            "interval" => Ok(Self::Interval),
            _ => Err(s.to_string()),
        }
    }
}

/// The global withdrawal schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WithdrawalSchedule {
    /// Withdrawals allowed on the listed weekdays.
    DaysOfWeek(WeekdaySet),
    /// Withdrawals allowed once the interval has elapsed since the last one.
    Interval(IntervalDays),
}

impl WithdrawalSchedule {
    /// Returns which mode this schedule is in.
    #[must_use]
    pub const fn kind(&self) -> ScheduleKind {
        match self {
            Self::DaysOfWeek(_) => ScheduleKind::DaysOfWeek,
            Self::Interval(_) => ScheduleKind::Interval,
        }
    }

    /// Returns the weekday set if in days-of-week mode.
    #[must_use]
    pub const fn days_of_week(&self) -> Option<WeekdaySet> {
        match self {
            Self::DaysOfWeek(days) => Some(*days),
            Self::Interval(_) => None,
        }
    }

    /// Returns the interval if in interval mode.
    #[must_use]
    pub const fn interval_days(&self) -> Option<IntervalDays> {
        match self {
            Self::Interval(days) => Some(*days),
            Self::DaysOfWeek(_) => None,
        }
    }
}

impl Default for WithdrawalSchedule {
    /// Monday, Wednesday and Friday.
    fn default() -> Self {
        Self::DaysOfWeek(WeekdaySet {
            mask: (1 << 1) | (1 << 3) | (1 << 5),
        })
    }
}

impl std::fmt::Display for WithdrawalSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DaysOfWeek(days) => write!(f, "daysOfWeek[{}]", days.names().join(",")),
            Self::Interval(days) => write!(f, "interval[{}d]", days.days()),
        }
    }
}

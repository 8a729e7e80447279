// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{DomainError, ScheduleViolation};
use crate::schedule::{IntervalDays, ScheduleKind, WeekdaySet, WithdrawalSchedule};
use crate::types::RestrictionReason;
use std::collections::BTreeSet;

/// Validates raw administrator input and builds a schedule from it.
///
/// Only the payload for the selected mode is inspected; the other payload is
/// ignored even if present. Every violated rule is reported.
///
/// # Arguments
///
/// * `schedule_type` - `"daysOfWeek"` or `"interval"`
/// * `days_of_week` - Weekday numbers, Sunday=0 .. Saturday=6
/// * `interval_days` - Minimum days between withdrawals
///
/// # Errors
///
/// Returns `DomainError::InvalidSchedule` listing every violation if:
/// - The schedule type is unknown
/// - Days-of-week mode has no days, or any day is outside `0..=6`
/// - Interval mode has no interval, or it is outside `1..=30`
pub fn validate_schedule(
    schedule_type: &str,
    days_of_week: Option<&[i64]>,
    interval_days: Option<i64>,
) -> Result<WithdrawalSchedule, DomainError> {
    let kind: ScheduleKind = schedule_type.parse().map_err(|unknown: String| {
        DomainError::InvalidSchedule {
            violations: vec![ScheduleViolation::UnknownScheduleType(unknown)],
        }
    })?;

    let mut violations: Vec<ScheduleViolation> = Vec::new();

    match kind {
        ScheduleKind::DaysOfWeek => {
            let days: &[i64] = days_of_week.unwrap_or_default();
            if days.is_empty() {
                violations.push(ScheduleViolation::EmptyDaysOfWeek);
            }
            violations.extend(
                days.iter()
                    .filter(|day| !(0..=6).contains(*day))
                    .map(|day| ScheduleViolation::WeekdayOutOfRange(*day)),
            );

            if violations.is_empty() {
                let set: WeekdaySet = WeekdaySet::from_numbers(days)?;
                return Ok(WithdrawalSchedule::DaysOfWeek(set));
            }
        }
        ScheduleKind::Interval => match interval_days {
            None => violations.push(ScheduleViolation::MissingIntervalDays),
            Some(days) => match IntervalDays::new(days) {
                Ok(interval) => return Ok(WithdrawalSchedule::Interval(interval)),
                Err(_) => violations.push(ScheduleViolation::IntervalOutOfRange(days)),
            },
        },
    }

    Err(DomainError::InvalidSchedule { violations })
}

/// A validated restriction change, ready to apply to each selected user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionChange {
    /// The distinct users to update, ascending.
    pub user_ids: BTreeSet<i64>,
    /// The restriction to set; `None` lifts any restriction.
    pub restriction: Option<RestrictionReason>,
}

/// Validates a bulk restriction request.
///
/// When `restricted` is false the reason is ignored and the resulting change
/// clears any existing reason.
///
/// # Errors
///
/// Returns an error if:
/// - `user_ids` is empty
/// - `restricted` is true and the trimmed reason is empty or missing
pub fn validate_restriction_request(
    user_ids: &[i64],
    restricted: bool,
    reason: Option<&str>,
) -> Result<RestrictionChange, DomainError> {
    if user_ids.is_empty() {
        return Err(DomainError::EmptyUserSelection);
    }

    let restriction: Option<RestrictionReason> = if restricted {
        Some(RestrictionReason::new(reason.unwrap_or_default())?)
    } else {
        None
    };

    Ok(RestrictionChange {
        user_ids: user_ids.iter().copied().collect(),
        restriction,
    })
}

/// Validates and trims a user display name.
///
/// # Errors
///
/// Returns `DomainError::EmptyUserName` if the trimmed name is empty.
pub fn validate_user_name(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyUserName);
    }
    Ok(trimmed.to_string())
}

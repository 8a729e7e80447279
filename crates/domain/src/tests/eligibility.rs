// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{date, every, last_withdrew_on, mon_wed_fri, restricted, tuesday};
use crate::{Decision, ReasonCode, UserWithdrawalState, WeekdaySet, WithdrawalSchedule, evaluate};
use time::{Date, Duration, Month, Weekday};

#[test]
fn test_days_of_week_denies_tuesday_and_points_to_wednesday() {
    let today: Date = tuesday();
    assert_eq!(today.weekday(), Weekday::Tuesday);

    let decision: Decision = evaluate(&mon_wed_fri(), &UserWithdrawalState::new(), today);

    assert!(!decision.allowed_today);
    assert_eq!(decision.reason_code, ReasonCode::OutsideScheduleDaysOfWeek);
    assert_eq!(decision.next_eligible_date, date(2026, Month::March, 4));
    assert_eq!(decision.next_eligible_date.weekday(), Weekday::Wednesday);
}

#[test]
fn test_days_of_week_allows_scheduled_day() {
    let wednesday: Date = date(2026, Month::March, 4);

    let decision: Decision = evaluate(&mon_wed_fri(), &UserWithdrawalState::new(), wednesday);

    assert!(decision.allowed_today);
    assert_eq!(decision.reason_code, ReasonCode::Allowed);
    assert_eq!(decision.next_eligible_date, wednesday);
}

#[test]
fn test_days_of_week_wraps_over_weekend() {
    // Saturday -> next Monday
    let saturday: Date = date(2026, Month::March, 7);

    let decision: Decision = evaluate(&mon_wed_fri(), &UserWithdrawalState::new(), saturday);

    assert!(!decision.allowed_today);
    assert_eq!(decision.next_eligible_date, date(2026, Month::March, 9));
}

#[test]
fn test_single_day_schedule_next_is_one_week_later_at_most() {
    let sundays_only: WithdrawalSchedule =
        WithdrawalSchedule::DaysOfWeek(WeekdaySet::new([Weekday::Sunday]).unwrap());
    let monday: Date = date(2026, Month::March, 2);

    let decision: Decision = evaluate(&sundays_only, &UserWithdrawalState::new(), monday);

    assert!(!decision.allowed_today);
    assert_eq!(decision.next_eligible_date, date(2026, Month::March, 8));
    assert_eq!(decision.days_until_eligible(monday), 6);
}

#[test]
fn test_days_of_week_ignores_withdrawal_history() {
    let wednesday: Date = date(2026, Month::March, 4);

    let decision: Decision = evaluate(&mon_wed_fri(), &last_withdrew_on(wednesday), wednesday);

    assert!(decision.allowed_today);
}

#[test]
fn test_interval_allows_when_exactly_interval_elapsed() {
    let today: Date = tuesday();

    let decision: Decision = evaluate(
        &every(2),
        &last_withdrew_on(today - Duration::days(2)),
        today,
    );

    assert!(decision.allowed_today);
    assert_eq!(decision.reason_code, ReasonCode::Allowed);
}

#[test]
fn test_interval_denies_one_day_short() {
    let today: Date = tuesday();
    let last: Date = today - Duration::days(1);

    let decision: Decision = evaluate(&every(2), &last_withdrew_on(last), today);

    assert!(!decision.allowed_today);
    assert_eq!(decision.reason_code, ReasonCode::OutsideScheduleInterval);
    assert_eq!(decision.next_eligible_date, last + Duration::days(2));
    assert_eq!(decision.days_until_eligible(today), 1);
}

#[test]
fn test_interval_same_day_second_withdrawal_is_denied() {
    let today: Date = tuesday();

    let decision: Decision = evaluate(&every(1), &last_withdrew_on(today), today);

    assert!(!decision.allowed_today);
    assert_eq!(decision.next_eligible_date, today + Duration::days(1));
}

#[test]
fn test_interval_without_history_is_allowed() {
    let decision: Decision = evaluate(&every(30), &UserWithdrawalState::new(), tuesday());

    assert!(decision.allowed_today);
}

#[test]
fn test_interval_with_future_last_date_is_denied_until_interval_passes() {
    let today: Date = tuesday();
    let last: Date = today + Duration::days(1);

    let decision: Decision = evaluate(&every(3), &last_withdrew_on(last), today);

    assert!(!decision.allowed_today);
    assert_eq!(decision.next_eligible_date, last + Duration::days(3));
}

#[test]
fn test_manual_restriction_overrides_any_schedule() {
    let today: Date = date(2026, Month::March, 4);
    let state: UserWithdrawalState = restricted("KYC pending");

    for schedule in [mon_wed_fri(), every(1)] {
        let decision: Decision = evaluate(&schedule, &state, today);

        assert!(!decision.allowed_today);
        assert_eq!(decision.reason_code, ReasonCode::ManuallyRestricted);
        assert_eq!(decision.next_eligible_date, today);
        assert_eq!(decision.days_until_eligible(today), 0);
    }
}

#[test]
fn test_reason_code_string_forms_are_stable() {
    assert_eq!(ReasonCode::Allowed.to_string(), "Allowed");
    assert_eq!(ReasonCode::ManuallyRestricted.to_string(), "ManuallyRestricted");
    assert_eq!(
        ReasonCode::OutsideScheduleDaysOfWeek.to_string(),
        "OutsideScheduleDaysOfWeek"
    );
    assert_eq!(
        ReasonCode::OutsideScheduleInterval.to_string(),
        "OutsideScheduleInterval"
    );
}

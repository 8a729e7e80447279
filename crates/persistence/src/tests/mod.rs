// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use time::{Date, Month};
use withdrawal_gate::{Command, TransitionResult, UserState, apply};
use withdrawal_gate_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use withdrawal_gate_domain::{
    RestrictionReason, UserWithdrawalState, WithdrawalSchedule,
};

use crate::Persistence;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Friday, 2026-03-06.
pub fn friday() -> Date {
    Date::from_calendar_date(2026, Month::March, 6).expect("Valid test date")
}

pub fn restriction_transition(user_id: i64, reason: Option<&str>) -> TransitionResult {
    apply(
        &UserState::new(user_id, UserWithdrawalState::new()),
        &WithdrawalSchedule::default(),
        Command::SetRestriction {
            restriction: reason.map(|r| RestrictionReason::new(r).expect("Valid reason")),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("Valid transition")
}

pub fn registration_event(user_id: i64) -> AuditEvent {
    AuditEvent::new(
        create_test_actor(),
        create_test_cause(),
        Action::new(String::from("RegisterUser"), None),
        StateSnapshot::new(String::from("none")),
        StateSnapshot::new(format!("user_id={user_id}")),
        AuditScope::User(user_id),
    )
}

pub fn persistence_with_users(names: &[&str]) -> (Persistence, Vec<i64>) {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");
    let ids: Vec<i64> = names
        .iter()
        .map(|name| {
            persistence
                .register_user(name, registration_event)
                .expect("User registered")
                .0
        })
        .collect();
    (persistence, ids)
}

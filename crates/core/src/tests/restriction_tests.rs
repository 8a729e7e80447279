// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_cause, fresh_user, reason, wednesday};
use crate::{Command, CoreError, TransitionResult, UserState, apply};
use withdrawal_gate_audit::AuditScope;
use withdrawal_gate_domain::{UserWithdrawalState, WithdrawalSchedule};

fn restrict(state: &UserState, text: Option<&str>) -> TransitionResult {
    apply(
        state,
        &WithdrawalSchedule::default(),
        Command::SetRestriction {
            restriction: text.map(reason),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}

#[test]
fn test_restriction_sets_flag_and_reason() {
    let transition: TransitionResult = restrict(&fresh_user(7), Some("KYC pending"));

    assert!(transition.new_state.withdrawal.is_restricted());
    assert_eq!(
        transition.new_state.withdrawal.restriction_reason(),
        Some("KYC pending")
    );
    assert_eq!(transition.audit_event.scope, AuditScope::User(7));
    assert_eq!(transition.audit_event.action.name, "SetRestriction");
    assert!(transition.audit_event.after.data.contains("restricted=true"));
}

#[test]
fn test_lifting_restriction_clears_reason_and_keeps_history() {
    let state: UserState = UserState::new(
        3,
        UserWithdrawalState::new()
            .with_last_withdrawal(wednesday())
            .with_restriction(Some(reason("Fraud review"))),
    );

    let transition: TransitionResult = restrict(&state, None);

    assert!(!transition.new_state.withdrawal.is_restricted());
    assert_eq!(transition.new_state.withdrawal.restriction_reason(), None);
    assert_eq!(
        transition.new_state.withdrawal.last_withdrawal_date,
        Some(wednesday())
    );
}

#[test]
fn test_restriction_is_idempotent() {
    let once: TransitionResult = restrict(&fresh_user(1), Some("KYC"));
    let twice: TransitionResult = restrict(&once.new_state, Some("KYC"));

    assert_eq!(once.new_state, twice.new_state);
}

#[test]
fn test_schedule_command_is_rejected_for_user_scope() {
    let result: Result<TransitionResult, CoreError> = apply(
        &fresh_user(1),
        &WithdrawalSchedule::default(),
        Command::SetSchedule {
            schedule: WithdrawalSchedule::default(),
        },
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(CoreError::WrongScope {
            command: "SetSchedule",
            scope: "user",
        })
    ));
}

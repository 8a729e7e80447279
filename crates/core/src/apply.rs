// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{ScheduleSnapshot, ScheduleTransition, TransitionResult, UserState};
use withdrawal_gate_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use withdrawal_gate_domain::{Decision, UserWithdrawalState, WithdrawalSchedule, evaluate};

/// Applies a schedule command, producing the next snapshot and its audit event.
///
/// The replacement is wholesale: the new snapshot carries only the submitted
/// schedule and the next version number.
///
/// # Arguments
///
/// * `current` - The snapshot currently in force
/// * `command` - Must be `Command::SetSchedule`
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns `CoreError::WrongScope` for any command other than `SetSchedule`.
pub fn apply_schedule(
    current: &ScheduleSnapshot,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<ScheduleTransition, CoreError> {
    let name: &'static str = command.name();
    let Command::SetSchedule { schedule } = command else {
        return Err(CoreError::WrongScope {
            command: name,
            scope: "schedule",
        });
    };

    let new_snapshot: ScheduleSnapshot =
        ScheduleSnapshot::new(current.version.saturating_add(1), schedule);

    let action: Action = Action::new(
        name.to_string(),
        Some(format!(
            "Replaced withdrawal schedule with {}",
            new_snapshot.schedule
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        current.to_snapshot(),
        new_snapshot.to_snapshot(),
        AuditScope::Global,
    );

    Ok(ScheduleTransition {
        new_snapshot,
        audit_event,
    })
}

/// Applies a user-scoped command to the current state, producing a new state
/// and audit event.
///
/// `RecordWithdrawal` re-evaluates eligibility against `schedule` for the
/// command's date and refuses to record a withdrawal the evaluator does not
/// allow.
///
/// # Arguments
///
/// * `state` - The user's current state (immutable)
/// * `schedule` - The schedule in force
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - A withdrawal is not permitted on the command's date
/// - The command is `SetSchedule`
pub fn apply(
    state: &UserState,
    schedule: &WithdrawalSchedule,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let before: StateSnapshot = state.to_snapshot();

    match command {
        Command::SetRestriction { restriction } => {
            let details: String = restriction.as_ref().map_or_else(
                || String::from("Lifted withdrawal restriction"),
                |reason| format!("Restricted withdrawals: {}", reason.value()),
            );
            let withdrawal: UserWithdrawalState = state.withdrawal.with_restriction(restriction);
            let new_state: UserState = UserState::new(state.user_id, withdrawal);

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                Action::new(name.to_string(), Some(details)),
                before,
                new_state.to_snapshot(),
                AuditScope::User(state.user_id),
            );

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::RecordWithdrawal { date, request } => {
            let decision: Decision = evaluate(schedule, &state.withdrawal, date);
            if !decision.allowed_today {
                return Err(CoreError::NotEligible { decision });
            }

            let withdrawal: UserWithdrawalState = state.withdrawal.with_last_withdrawal(date);
            let new_state: UserState = UserState::new(state.user_id, withdrawal);

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                Action::new(
                    name.to_string(),
                    Some(format!("Withdrawal on {date}: {}", request.masked_summary())),
                ),
                before,
                new_state.to_snapshot(),
                AuditScope::User(state.user_id),
            );

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::SetSchedule { .. } => Err(CoreError::WrongScope {
            command: name,
            scope: "user",
        }),
    }
}

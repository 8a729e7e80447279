// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::Value;

use super::helpers::{create_test_admin, create_test_cause, service_with_users, wednesday};
use crate::{
    ApiError, AuditTimelineResponse, AuthenticatedActor, RegisterUserRequest,
    RegisterUserResponse, WithdrawalOutcome,
};

#[test]
fn test_register_user_trims_name_and_audits() {
    let (service, _clock, _ids) = service_with_users(wednesday(), &[]);

    let response: RegisterUserResponse = service
        .register_user(
            &RegisterUserRequest {
                display_name: String::from("  Ann Lee  "),
            },
            &create_test_admin(),
            create_test_cause(),
        )
        .unwrap();

    assert_eq!(response.display_name, "Ann Lee");
    let timeline: AuditTimelineResponse =
        service.get_audit_timeline(Some(response.user_id)).unwrap();
    assert_eq!(timeline.events.len(), 1);
    assert_eq!(timeline.events[0].action, "RegisterUser");
    assert!(timeline.events[0].after.contains("restricted=false"));
}

#[test]
fn test_register_user_rejects_blank_name() {
    let (service, _clock, _ids) = service_with_users(wednesday(), &[]);

    let err: ApiError = service
        .register_user(
            &RegisterUserRequest {
                display_name: String::from(" "),
            },
            &create_test_admin(),
            create_test_cause(),
        )
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "displayName"));
    assert!(service.list_users(None).unwrap().users.is_empty());
}

#[test]
fn test_user_cannot_register_users() {
    let (service, _clock, _ids) = service_with_users(wednesday(), &[]);

    let err: ApiError = service
        .register_user(
            &RegisterUserRequest {
                display_name: String::from("Mallory"),
            },
            &AuthenticatedActor::for_user(1),
            create_test_cause(),
        )
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_timeline_for_unknown_user_is_not_found() {
    let (service, _clock, _ids) = service_with_users(wednesday(), &["Ann"]);

    let err: ApiError = service.get_audit_timeline(Some(77)).unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_unknown_audit_event_is_not_found() {
    let (service, _clock, _ids) = service_with_users(wednesday(), &[]);

    let err: ApiError = service.get_audit_event(4242).unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_outcomes_serialize_with_status_tag() {
    let accepted: Value = serde_json::to_value(WithdrawalOutcome::Accepted {
        withdrawal_date: wednesday(),
        event_id: 9,
    })
    .unwrap();
    assert_eq!(accepted["status"], "accepted");
    assert_eq!(accepted["withdrawalDate"], "2026-03-04");
    assert_eq!(accepted["eventId"], 9);

    let rejected: Value = serde_json::to_value(WithdrawalOutcome::Rejected {
        reason_code: withdrawal_gate_domain::ReasonCode::ManuallyRestricted,
        next_eligible_date: None,
        message: String::from("Withdrawals are restricted for this account"),
    })
    .unwrap();
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["reasonCode"], "ManuallyRestricted");
    assert_eq!(rejected["nextEligibleDate"], Value::Null);
}

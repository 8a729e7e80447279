// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AuthError, AuthenticatedActor, AuthorizationService, Role, authenticate_stub};

#[test]
fn test_authenticate_stub_succeeds_with_valid_id() {
    let actor: AuthenticatedActor =
        authenticate_stub(String::from("admin-1"), Role::Admin).unwrap();
    assert_eq!(actor.id, "admin-1");
    assert_eq!(actor.role, Role::Admin);
}

#[test]
fn test_authenticate_stub_fails_with_blank_id() {
    let result: Result<AuthenticatedActor, AuthError> =
        authenticate_stub(String::from("   "), Role::Admin);
    assert!(matches!(
        result.unwrap_err(),
        AuthError::AuthenticationFailed { .. }
    ));
}

#[test]
fn test_role_parses_wire_names() {
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("User".parse::<Role>().unwrap(), Role::User);
    assert!("operator".parse::<Role>().is_err());
}

#[test]
fn test_admin_only_actions_reject_users() {
    let user: AuthenticatedActor = AuthenticatedActor::for_user(7);
    assert!(AuthorizationService::authorize_set_schedule(&user).is_err());
    assert!(AuthorizationService::authorize_bulk_restriction(&user).is_err());
    assert!(AuthorizationService::authorize_register_user(&user).is_err());
}

#[test]
fn test_users_withdraw_only_from_their_own_account() {
    let user: AuthenticatedActor = AuthenticatedActor::for_user(7);
    let admin: AuthenticatedActor = AuthenticatedActor::new(String::from("7"), Role::Admin);

    assert!(AuthorizationService::authorize_withdraw(&user, 7).is_ok());
    assert!(AuthorizationService::authorize_withdraw(&user, 8).is_err());
    assert!(AuthorizationService::authorize_withdraw(&admin, 7).is_err());
}

#[test]
fn test_audit_actor_carries_role_name() {
    let user: AuthenticatedActor = AuthenticatedActor::for_user(42);
    let actor = user.to_audit_actor();
    assert_eq!(actor.id, "42");
    assert_eq!(actor.actor_type, "user");
}

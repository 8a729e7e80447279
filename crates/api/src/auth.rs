// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Authentication is a stub: callers are trusted to state who they are.
//! Authorization is real and is checked before any command is applied.

use std::str::FromStr;
use withdrawal_gate_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Administrators manage the schedule, restrictions and the user
    /// directory.
    Admin,
    /// Platform users may submit withdrawals for themselves only.
    User,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" | "Admin" => Ok(Self::Admin),
            "user" | "User" => Ok(Self::User),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {s}. Must be 'admin' or 'user'"),
            }),
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// A user acting on their own account.
    #[must_use]
    pub fn for_user(user_id: i64) -> Self {
        Self::new(user_id.to_string(), Role::User)
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Stub authentication: accepts any non-blank identifier.
///
/// # Arguments
///
/// * `actor_id` - The claimed actor identifier
/// * `role` - The claimed role
///
/// # Errors
///
/// Returns `AuthError::AuthenticationFailed` if `actor_id` is blank.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::User => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may replace the withdrawal schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_set_schedule(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "set_withdrawal_schedule")
    }

    /// Checks if an actor may restrict or unrestrict users.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_bulk_restriction(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "bulk_withdrawal_restriction")
    }

    /// Checks if an actor may register users.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_register_user(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "register_user")
    }

    /// Checks if an actor may submit a withdrawal for `user_id`.
    ///
    /// Users may withdraw only from their own account. Administrators never
    /// withdraw on a user's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not the user themselves.
    pub fn authorize_withdraw(actor: &AuthenticatedActor, user_id: i64) -> Result<(), AuthError> {
        match actor.role {
            Role::User if actor.id == user_id.to_string() => Ok(()),
            Role::User | Role::Admin => Err(AuthError::Unauthorized {
                action: String::from("withdraw"),
                required_role: String::from("account owner"),
            }),
        }
    }
}

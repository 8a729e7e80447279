// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use thiserror::Error;
use withdrawal_gate::CoreError;
use withdrawal_gate_domain::DomainError;
use withdrawal_gate_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// A withdrawal refused by the schedule is not an error; see
/// `WithdrawalOutcome::Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidSchedule { .. }
        | DomainError::EmptyWeekdaySet
        | DomainError::InvalidIntervalDays(_)
        | DomainError::InvalidWeekday(_) => ApiError::InvalidInput {
            field: String::from("schedule"),
            message,
        },
        DomainError::EmptyRestrictionReason => ApiError::InvalidInput {
            field: String::from("reason"),
            message,
        },
        DomainError::EmptyUserSelection => ApiError::InvalidInput {
            field: String::from("userIds"),
            message,
        },
        DomainError::EmptyUserName => ApiError::InvalidInput {
            field: String::from("displayName"),
            message,
        },
        DomainError::InvalidAmount(_) => ApiError::InvalidInput {
            field: String::from("amount"),
            message,
        },
        DomainError::UnknownPayoutMethod(_) => ApiError::InvalidInput {
            field: String::from("method"),
            message,
        },
        DomainError::MissingPayoutDetails { method } => ApiError::InvalidInput {
            field: method,
            message,
        },
        DomainError::MissingPayoutField { field } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// `CoreError::NotEligible` is handled by the withdrawal gate before it can
/// reach this function; should one arrive here it is reported as a rule
/// violation.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotEligible { decision } => ApiError::DomainRuleViolation {
            rule: String::from("withdrawal_eligibility"),
            message: format!("Withdrawal not permitted: {}", decision.reason_code),
        },
        other @ CoreError::WrongScope { .. } => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UserNotFound(user_id) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        },
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {event_id} does not exist"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

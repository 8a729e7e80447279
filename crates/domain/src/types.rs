// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::Date;

/// The administrator-supplied reason for a manual restriction.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestrictionReason(String);

impl RestrictionReason {
    /// Creates a restriction reason, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyRestrictionReason` if nothing remains after trimming.
    pub fn new(reason: &str) -> Result<Self, DomainError> {
        let trimmed: &str = reason.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyRestrictionReason);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the reason text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Per-user withdrawal state.
///
/// The restriction flag and its reason are a single optional field, so a
/// restricted user without a reason (or the reverse) cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserWithdrawalState {
    /// The manual restriction, if any.
    pub restriction: Option<RestrictionReason>,
    /// The calendar date of the last accepted withdrawal.
    pub last_withdrawal_date: Option<Date>,
}

impl UserWithdrawalState {
    /// Creates the default state: not restricted, no withdrawal history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            restriction: None,
            last_withdrawal_date: None,
        }
    }

    /// Returns whether withdrawals are manually restricted.
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.restriction.is_some()
    }

    /// Returns the restriction reason, if restricted.
    #[must_use]
    pub fn restriction_reason(&self) -> Option<&str> {
        self.restriction.as_ref().map(RestrictionReason::value)
    }

    /// Returns a copy with the restriction replaced.
    #[must_use]
    pub fn with_restriction(&self, restriction: Option<RestrictionReason>) -> Self {
        Self {
            restriction,
            last_withdrawal_date: self.last_withdrawal_date,
        }
    }

    /// Returns a copy with the last withdrawal date set to `date`.
    #[must_use]
    pub fn with_last_withdrawal(&self, date: Date) -> Self {
        Self {
            restriction: self.restriction.clone(),
            last_withdrawal_date: Some(date),
        }
    }
}

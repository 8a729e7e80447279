// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names follow the web client's camelCase JSON contract.

use serde::{Deserialize, Serialize};
use time::Date;
use withdrawal_gate::ScheduleSnapshot;
use withdrawal_gate_audit::AuditEvent;
use withdrawal_gate_domain::{
    BankTransfer, CryptoTransfer, Decision, ReasonCode, UserWithdrawalState, WithdrawalRequest,
    WithdrawalSchedule, validate_withdrawal_request, weekday_name,
};
use withdrawal_gate_persistence::UserRecord;

use crate::error::{ApiError, translate_domain_error};

// ============================================================================
// Schedule settings
// ============================================================================

/// The stored schedule as shown on the administrator settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalSettings {
    /// `daysOfWeek` or `interval`.
    pub withdrawal_schedule_type: String,
    /// Weekday numbers, Sunday = 0. Empty in interval mode.
    pub withdrawal_days_of_week: Vec<u8>,
    /// Minimum days between withdrawals. Absent in days-of-week mode.
    pub withdrawal_interval_days: Option<u8>,
    /// The snapshot version.
    pub version: i64,
}

impl WithdrawalSettings {
    /// Builds the settings view of a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &ScheduleSnapshot) -> Self {
        Self {
            withdrawal_schedule_type: snapshot.schedule.kind().as_str().to_string(),
            withdrawal_days_of_week: snapshot
                .schedule
                .days_of_week()
                .map(|days| days.numbers())
                .unwrap_or_default(),
            withdrawal_interval_days: snapshot.schedule.interval_days().map(|days| days.days()),
            version: snapshot.version,
        }
    }
}

/// API response for reading the current schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalSettingsResponse {
    /// The schedule in force.
    pub settings: WithdrawalSettings,
}

/// API request to replace the global schedule.
///
/// Only the payload matching `schedule_type` is read; the other is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWithdrawalScheduleRequest {
    /// `daysOfWeek` or `interval`.
    pub schedule_type: String,
    /// Weekday numbers, Sunday = 0.
    #[serde(default)]
    pub days_of_week: Option<Vec<i64>>,
    /// Minimum days between withdrawals, 1 to 30.
    #[serde(default)]
    pub interval_days: Option<i64>,
}

/// API response for a successful schedule replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWithdrawalScheduleResponse {
    /// The schedule now in force.
    pub settings: WithdrawalSettings,
    /// The audit event recording the change.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Bulk restriction
// ============================================================================

/// API request to restrict or unrestrict a set of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRestrictionRequest {
    /// The users to update. Duplicates are collapsed.
    pub user_ids: Vec<i64>,
    /// Whether to restrict (true) or lift a restriction (false).
    pub restricted: bool,
    /// Required when restricting; ignored when lifting.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API response for a bulk restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRestrictionResponse {
    /// Distinct users named in the request.
    pub requested_count: usize,
    /// Users whose state changed.
    pub updated_count: usize,
    /// Users already in the requested state.
    pub unchanged_count: usize,
    /// Requested identifiers that do not exist.
    pub skipped_user_ids: Vec<i64>,
    /// Users whose update failed. Other users are still updated.
    pub failed_user_ids: Vec<i64>,
    /// A summary message.
    pub message: String,
}

// ============================================================================
// Overview
// ============================================================================

/// Eligibility as shown to a user before they submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalScheduleView {
    /// `daysOfWeek` or `interval`.
    pub schedule_type: String,
    /// Weekday names in days-of-week mode, otherwise empty.
    pub withdrawal_days: Vec<String>,
    /// The interval in interval mode, otherwise absent.
    pub interval_days: Option<u8>,
    /// Whether a withdrawal may be submitted today.
    pub allowed_today: bool,
    /// Why.
    pub reason_code: ReasonCode,
    /// The next date withdrawal opens; absent when allowed today or when
    /// manually restricted.
    pub next_withdrawal_date: Option<Date>,
    /// The weekday name of `next_withdrawal_date`.
    pub next_withdrawal_day: Option<String>,
    /// Whole days from today until `next_withdrawal_date`.
    pub days_until_next_withdrawal: Option<i64>,
}

impl WithdrawalScheduleView {
    /// Builds the view of a decision made on `today`.
    #[must_use]
    pub fn new(schedule: &WithdrawalSchedule, decision: &Decision, today: Date) -> Self {
        let next: Option<Date> = next_date(decision);
        Self {
            schedule_type: schedule.kind().as_str().to_string(),
            withdrawal_days: schedule
                .days_of_week()
                .map(|days| days.names())
                .unwrap_or_default(),
            interval_days: schedule.interval_days().map(|days| days.days()),
            allowed_today: decision.allowed_today,
            reason_code: decision.reason_code,
            next_withdrawal_date: next,
            next_withdrawal_day: next.map(|date| weekday_name(date.weekday()).to_string()),
            days_until_next_withdrawal: next.map(|_| decision.days_until_eligible(today)),
        }
    }
}

/// A user's withdrawal overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    /// The user.
    pub user_id: i64,
    /// Whether an administrator has restricted this user.
    pub withdrawal_restricted: bool,
    /// The administrator's reason, when restricted.
    pub withdrawal_restriction_reason: Option<String>,
    /// The evaluated schedule.
    pub withdrawal_schedule: WithdrawalScheduleView,
}

/// API response for the user overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// The overview.
    pub overview: UserOverview,
}

// ============================================================================
// Withdrawal submission
// ============================================================================

/// Bank details as submitted by the withdraw form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    /// The receiving bank.
    pub bank: String,
    /// The receiving account number.
    pub account_number: String,
    /// Payment reference.
    pub reference: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Account holder first name.
    pub first_name: Option<String>,
    /// Account holder last name.
    pub last_name: Option<String>,
}

impl From<&BankDetails> for BankTransfer {
    fn from(details: &BankDetails) -> Self {
        Self {
            bank: details.bank.clone(),
            account_number: details.account_number.clone(),
            reference: details.reference.clone(),
            phone: details.phone.clone(),
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
        }
    }
}

/// Crypto details as submitted by the withdraw form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CryptoDetails {
    /// The wallet or network name.
    pub crypto_wallet: String,
    /// The receiving address.
    pub wallet_address: String,
}

impl From<&CryptoDetails> for CryptoTransfer {
    fn from(details: &CryptoDetails) -> Self {
        Self {
            crypto_wallet: details.crypto_wallet.clone(),
            wallet_address: details.wallet_address.clone(),
        }
    }
}

/// API request to submit a withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// The amount in major currency units.
    pub amount: f64,
    /// `bank` or `crypto`.
    pub method: String,
    /// Required when `method` is `bank`.
    #[serde(default)]
    pub bank: Option<BankDetails>,
    /// Required when `method` is `crypto`.
    #[serde(default)]
    pub crypto: Option<CryptoDetails>,
}

impl WithdrawRequest {
    /// Validates the payload shape.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` naming the offending field.
    pub fn to_domain(&self) -> Result<WithdrawalRequest, ApiError> {
        let bank: Option<BankTransfer> = self.bank.as_ref().map(BankTransfer::from);
        let crypto: Option<CryptoTransfer> = self.crypto.as_ref().map(CryptoTransfer::from);
        validate_withdrawal_request(self.amount, &self.method, bank.as_ref(), crypto.as_ref())
            .map_err(translate_domain_error)
    }
}

/// The result of a withdrawal submission.
///
/// A rejection is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum WithdrawalOutcome {
    /// The withdrawal was recorded.
    Accepted {
        /// The business date recorded as the last withdrawal.
        withdrawal_date: Date,
        /// The audit event recording the withdrawal.
        event_id: i64,
    },
    /// The schedule or a restriction refused the withdrawal.
    Rejected {
        /// Why.
        reason_code: ReasonCode,
        /// When withdrawal is next expected to open; absent when restricted.
        next_eligible_date: Option<Date>,
        /// A message suitable for display.
        message: String,
    },
}

impl WithdrawalOutcome {
    /// Builds a rejection from the refusing decision.
    #[must_use]
    pub fn rejected(decision: &Decision, state: &UserWithdrawalState) -> Self {
        let next_eligible_date: Option<Date> = next_date(decision);
        let message: String = match (decision.reason_code, next_eligible_date) {
            (ReasonCode::ManuallyRestricted, _) => state.restriction_reason().map_or_else(
                || String::from("Withdrawals are restricted for this account"),
                |reason| format!("Withdrawals are restricted for this account: {reason}"),
            ),
            (ReasonCode::OutsideScheduleDaysOfWeek, Some(next)) => format!(
                "Withdrawals are not available today. Next withdrawal day is {} {next}",
                weekday_name(next.weekday())
            ),
            (ReasonCode::OutsideScheduleInterval, Some(next)) => {
                format!("Withdrawal interval has not elapsed. Next withdrawal date is {next}")
            }
            _ => String::from("Withdrawals are not available today"),
        };

        Self::Rejected {
            reason_code: decision.reason_code,
            next_eligible_date,
            message,
        }
    }

    /// Returns whether the withdrawal was recorded.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// The next opening date, if one is known.
const fn next_date(decision: &Decision) -> Option<Date> {
    match decision.reason_code {
        ReasonCode::Allowed | ReasonCode::ManuallyRestricted => None,
        ReasonCode::OutsideScheduleDaysOfWeek | ReasonCode::OutsideScheduleInterval => {
            Some(decision.next_eligible_date)
        }
    }
}

// ============================================================================
// User directory
// ============================================================================

/// API request to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    /// The name shown in the administrator list.
    pub display_name: String,
}

/// API response for a successful user registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    /// The new user identifier.
    pub user_id: i64,
    /// The stored display name.
    pub display_name: String,
    /// A success message.
    pub message: String,
}

/// A user as listed for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// The user identifier.
    pub user_id: i64,
    /// The display name.
    pub display_name: String,
    /// Whether withdrawals are restricted.
    pub withdrawal_restricted: bool,
    /// The restriction reason, when restricted.
    pub withdrawal_restriction_reason: Option<String>,
    /// The last accepted withdrawal.
    pub last_withdrawal_date: Option<Date>,
}

impl From<UserRecord> for UserSummary {
    fn from(record: UserRecord) -> Self {
        Self {
            user_id: record.user_id,
            display_name: record.display_name,
            withdrawal_restricted: record.withdrawal.is_restricted(),
            withdrawal_restriction_reason: record
                .withdrawal
                .restriction_reason()
                .map(ToString::to_string),
            last_withdrawal_date: record.withdrawal.last_withdrawal_date,
        }
    }
}

/// API response for listing users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// The matching users, ordered by identifier.
    pub users: Vec<UserSummary>,
}

// ============================================================================
// Audit
// ============================================================================

/// One audit event as returned to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventView {
    /// The event identifier.
    pub event_id: Option<i64>,
    /// The affected user; absent for schedule changes.
    pub user_id: Option<i64>,
    /// Who acted.
    pub actor_id: String,
    /// The actor's role.
    pub actor_type: String,
    /// The request that caused the event.
    pub cause_id: String,
    /// Why.
    pub cause_description: String,
    /// The command name.
    pub action: String,
    /// Action details.
    pub details: Option<String>,
    /// State before.
    pub before: String,
    /// State after.
    pub after: String,
}

impl From<AuditEvent> for AuditEventView {
    fn from(event: AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            user_id: event.scope.user_id(),
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            cause_id: event.cause.id,
            cause_description: event.cause.description,
            action: event.action.name,
            details: event.action.details,
            before: event.before.data,
            after: event.after.data,
        }
    }
}

/// API response for the audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    /// Events in the order they were recorded.
    pub events: Vec<AuditEventView>,
}

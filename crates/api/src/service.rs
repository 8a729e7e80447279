// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The withdrawal service.
//!
//! Owns the shared mutable state of the system and the discipline around it:
//!
//! - The schedule is published as an immutable `Arc<ScheduleSnapshot>`.
//!   Readers clone the `Arc`; a replacement is persisted and then swapped in
//!   under the write guard, so no reader ever sees a half-applied schedule.
//! - Every read-evaluate-write for a user runs under that user's lock from
//!   `UserLocks`. Two submissions by the same user cannot both be accepted.
//! - The store is one connection behind a `Mutex`, held for one call at a
//!   time.
//!
//! Lock order is user lock, then schedule, then store. The schedule read
//! guard is never held while the store is locked.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use time::Date;
use tracing::{debug, info, warn};
use withdrawal_gate::{
    Command, CoreError, ScheduleSnapshot, ScheduleTransition, TransitionResult, UserState, apply,
    apply_schedule,
};
use withdrawal_gate_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use withdrawal_gate_domain::{
    Decision, RestrictionChange, RestrictionReason, UserWithdrawalState, WithdrawalRequest,
    WithdrawalSchedule, evaluate, validate_restriction_request, validate_schedule,
    validate_user_name,
};
use withdrawal_gate_persistence::{Persistence, PersistenceError, UserRecord};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::clock::Clock;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AuditEventView, AuditTimelineResponse, BulkRestrictionRequest, BulkRestrictionResponse,
    ListUsersResponse, OverviewResponse, RegisterUserRequest, RegisterUserResponse,
    SetWithdrawalScheduleRequest, SetWithdrawalScheduleResponse, UserOverview, UserSummary,
    WithdrawRequest, WithdrawalOutcome, WithdrawalScheduleView, WithdrawalSettings,
    WithdrawalSettingsResponse,
};
use crate::user_locks::{UserLockHandle, UserLocks};

/// What a bulk restriction did to one user.
enum RestrictionOutcome {
    Updated,
    Unchanged,
    Skipped,
}

fn poisoned(what: &str) -> ApiError {
    ApiError::Internal {
        message: format!("{what} lock poisoned"),
    }
}

/// Shared entry point for every withdrawal operation.
///
/// `WithdrawalService` is `Send + Sync`; wrap it in an `Arc` and call it from
/// any number of threads.
pub struct WithdrawalService {
    store: Mutex<Persistence>,
    schedule: RwLock<Arc<ScheduleSnapshot>>,
    user_locks: UserLocks,
    clock: Box<dyn Clock>,
}

impl WithdrawalService {
    /// Creates the service and publishes the stored schedule.
    ///
    /// # Arguments
    ///
    /// * `persistence` - An initialized store
    /// * `clock` - The source of the business date
    ///
    /// # Errors
    ///
    /// Returns an error if the stored schedule cannot be loaded.
    pub fn new(mut persistence: Persistence, clock: Box<dyn Clock>) -> Result<Self, ApiError> {
        let snapshot: ScheduleSnapshot = persistence
            .load_schedule()
            .map_err(translate_persistence_error)?;
        info!(
            version = snapshot.version,
            schedule = %snapshot.schedule,
            "Published withdrawal schedule"
        );

        Ok(Self {
            store: Mutex::new(persistence),
            schedule: RwLock::new(Arc::new(snapshot)),
            user_locks: UserLocks::new(),
            clock,
        })
    }

    fn store(&self) -> Result<MutexGuard<'_, Persistence>, ApiError> {
        self.store.lock().map_err(|_| poisoned("Store"))
    }

    #[cfg(test)]
    pub(crate) const fn user_locks(&self) -> &UserLocks {
        &self.user_locks
    }

    /// Returns the business date.
    #[must_use]
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// Returns the schedule snapshot currently published.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the schedule lock is poisoned.
    pub fn current_schedule(&self) -> Result<Arc<ScheduleSnapshot>, ApiError> {
        let published: RwLockReadGuard<'_, Arc<ScheduleSnapshot>> =
            self.schedule.read().map_err(|_| poisoned("Schedule"))?;
        Ok(Arc::clone(&published))
    }

    // ========================================================================
    // Schedule
    // ========================================================================

    /// Returns the schedule in force, for the administrator settings page.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the schedule lock is poisoned.
    pub fn get_withdrawal_settings(&self) -> Result<WithdrawalSettingsResponse, ApiError> {
        let snapshot: Arc<ScheduleSnapshot> = self.current_schedule()?;
        Ok(WithdrawalSettingsResponse {
            settings: WithdrawalSettings::from_snapshot(&snapshot),
        })
    }

    /// Replaces the global schedule wholesale.
    ///
    /// Validation reports every violated rule at once. On any error the
    /// previous schedule stays in force.
    ///
    /// # Arguments
    ///
    /// * `request` - The submitted schedule
    /// * `actor` - The authenticated administrator
    /// * `cause` - The cause recorded in the audit trail
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not an administrator
    /// - The schedule is invalid
    /// - The replacement cannot be persisted
    pub fn set_withdrawal_schedule(
        &self,
        request: &SetWithdrawalScheduleRequest,
        actor: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<SetWithdrawalScheduleResponse, ApiError> {
        AuthorizationService::authorize_set_schedule(actor)?;

        let schedule: WithdrawalSchedule = validate_schedule(
            &request.schedule_type,
            request.days_of_week.as_deref(),
            request.interval_days,
        )
        .map_err(translate_domain_error)?;

        let mut published: RwLockWriteGuard<'_, Arc<ScheduleSnapshot>> =
            self.schedule.write().map_err(|_| poisoned("Schedule"))?;

        let transition: ScheduleTransition = apply_schedule(
            &published,
            Command::SetSchedule { schedule },
            actor.to_audit_actor(),
            cause,
        )
        .map_err(translate_core_error)?;

        let event_id: i64 = self
            .store()?
            .persist_schedule_transition(&transition)
            .map_err(translate_persistence_error)?;

        let snapshot: Arc<ScheduleSnapshot> = Arc::new(transition.new_snapshot);
        *published = Arc::clone(&snapshot);
        drop(published);

        info!(
            actor_id = %actor.id,
            version = snapshot.version,
            schedule = %snapshot.schedule,
            event_id,
            "Replaced withdrawal schedule"
        );

        Ok(SetWithdrawalScheduleResponse {
            settings: WithdrawalSettings::from_snapshot(&snapshot),
            event_id,
            message: format!("Withdrawal schedule updated to {}", snapshot.schedule),
        })
    }

    // ========================================================================
    // Overview
    // ========================================================================

    /// Evaluates a user's eligibility for display.
    ///
    /// Uses the same evaluator as submission, against the currently published
    /// schedule and the stored user state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if the user does not exist.
    pub fn get_withdrawal_overview(&self, user_id: i64) -> Result<OverviewResponse, ApiError> {
        let snapshot: Arc<ScheduleSnapshot> = self.current_schedule()?;
        let today: Date = self.today();
        let withdrawal: UserWithdrawalState = self
            .store()?
            .get_withdrawal_state(user_id)
            .map_err(translate_persistence_error)?;

        let decision: Decision = evaluate(&snapshot.schedule, &withdrawal, today);
        debug!(user_id, %today, reason_code = %decision.reason_code, "Evaluated eligibility");

        Ok(OverviewResponse {
            overview: UserOverview {
                user_id,
                withdrawal_restricted: withdrawal.is_restricted(),
                withdrawal_restriction_reason: withdrawal
                    .restriction_reason()
                    .map(ToString::to_string),
                withdrawal_schedule: WithdrawalScheduleView::new(
                    &snapshot.schedule,
                    &decision,
                    today,
                ),
            },
        })
    }

    // ========================================================================
    // Bulk restriction
    // ========================================================================

    /// Sets or lifts the manual restriction on every listed user.
    ///
    /// Each user is updated on its own; unknown identifiers are skipped and
    /// reported, and users already in the requested state are left alone.
    /// A user whose update fails is reported in `failed_user_ids` and the
    /// remaining users are still attempted. Applying the same request twice
    /// leaves the same state.
    ///
    /// # Arguments
    ///
    /// * `request` - The users and the restriction to apply
    /// * `actor` - The authenticated administrator
    /// * `cause` - The cause recorded in the audit trail
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not an administrator
    /// - No users are listed
    /// - Restricting without a non-blank reason
    pub fn apply_bulk_restriction(
        &self,
        request: &BulkRestrictionRequest,
        actor: &AuthenticatedActor,
        cause: &Cause,
    ) -> Result<BulkRestrictionResponse, ApiError> {
        AuthorizationService::authorize_bulk_restriction(actor)?;

        let change: RestrictionChange = validate_restriction_request(
            &request.user_ids,
            request.restricted,
            request.reason.as_deref(),
        )
        .map_err(translate_domain_error)?;

        let mut updated_count: usize = 0;
        let mut unchanged_count: usize = 0;
        let mut skipped_user_ids: Vec<i64> = Vec::new();
        let mut failed_user_ids: Vec<i64> = Vec::new();

        for &user_id in &change.user_ids {
            match self.restrict_one(user_id, change.restriction.as_ref(), actor, cause) {
                Ok(RestrictionOutcome::Updated) => updated_count += 1,
                Ok(RestrictionOutcome::Unchanged) => unchanged_count += 1,
                Ok(RestrictionOutcome::Skipped) => skipped_user_ids.push(user_id),
                Err(e) => {
                    warn!(user_id, error = %e, "Failed to update withdrawal restriction");
                    failed_user_ids.push(user_id);
                }
            }
        }

        info!(
            actor_id = %actor.id,
            restricted = request.restricted,
            requested = change.user_ids.len(),
            updated = updated_count,
            unchanged = unchanged_count,
            skipped = skipped_user_ids.len(),
            failed = failed_user_ids.len(),
            "Applied bulk withdrawal restriction"
        );

        let verb: &str = if request.restricted {
            "Restricted"
        } else {
            "Unrestricted"
        };
        Ok(BulkRestrictionResponse {
            requested_count: change.user_ids.len(),
            updated_count,
            unchanged_count,
            message: format!(
                "{verb} withdrawals for {updated_count} user(s); {} not found, {} failed",
                skipped_user_ids.len(),
                failed_user_ids.len()
            ),
            skipped_user_ids,
            failed_user_ids,
        })
    }

    fn restrict_one(
        &self,
        user_id: i64,
        restriction: Option<&RestrictionReason>,
        actor: &AuthenticatedActor,
        cause: &Cause,
    ) -> Result<RestrictionOutcome, ApiError> {
        let user_lock: UserLockHandle<'_> = self.user_locks.for_user(user_id)?;
        let user_guard: MutexGuard<'_, ()> = user_lock.lock()?;
        let snapshot: Arc<ScheduleSnapshot> = self.current_schedule()?;
        let mut store: MutexGuard<'_, Persistence> = self.store()?;

        let withdrawal: UserWithdrawalState = match store.get_withdrawal_state(user_id) {
            Ok(withdrawal) => withdrawal,
            Err(PersistenceError::UserNotFound(_)) => {
                warn!(user_id, "Skipping unknown user in bulk restriction");
                return Ok(RestrictionOutcome::Skipped);
            }
            Err(e) => return Err(translate_persistence_error(e)),
        };

        if withdrawal.restriction.as_ref() == restriction {
            return Ok(RestrictionOutcome::Unchanged);
        }

        let transition: TransitionResult = apply(
            &UserState::new(user_id, withdrawal),
            &snapshot.schedule,
            Command::SetRestriction {
                restriction: restriction.cloned(),
            },
            actor.to_audit_actor(),
            cause.clone(),
        )
        .map_err(translate_core_error)?;

        let event_id: i64 = store
            .persist_user_transition(&transition)
            .map_err(translate_persistence_error)?;
        drop(store);
        drop(user_guard);

        debug!(user_id, event_id, "Updated withdrawal restriction");
        Ok(RestrictionOutcome::Updated)
    }

    // ========================================================================
    // Withdrawal gate
    // ========================================================================

    /// Submits a withdrawal for `user_id`.
    ///
    /// Under the user's lock: re-reads the published schedule and the stored
    /// state, takes today from the clock, evaluates, and if allowed records
    /// today as the last withdrawal date together with its audit event.
    /// A refusal changes nothing and is returned as
    /// `WithdrawalOutcome::Rejected`; this includes losing a race against a
    /// concurrent submission by the same user.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The account to withdraw from
    /// * `request` - The submitted payload
    /// * `actor` - The authenticated account owner
    /// * `cause` - The cause recorded in the audit trail
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not the account owner
    /// - The payload is malformed
    /// - The user does not exist
    /// - The store fails
    pub fn attempt_withdrawal(
        &self,
        user_id: i64,
        request: &WithdrawRequest,
        actor: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<WithdrawalOutcome, ApiError> {
        AuthorizationService::authorize_withdraw(actor, user_id)?;
        let validated: WithdrawalRequest = request.to_domain()?;

        let user_lock: UserLockHandle<'_> = self.user_locks.for_user(user_id)?;
        let user_guard: MutexGuard<'_, ()> = user_lock.lock()?;

        let snapshot: Arc<ScheduleSnapshot> = self.current_schedule()?;
        let today: Date = self.today();
        let mut store: MutexGuard<'_, Persistence> = self.store()?;
        let state: UserState = UserState::new(
            user_id,
            store
                .get_withdrawal_state(user_id)
                .map_err(translate_persistence_error)?,
        );

        let command: Command = Command::RecordWithdrawal {
            date: today,
            request: validated,
        };
        let outcome: WithdrawalOutcome = match apply(
            &state,
            &snapshot.schedule,
            command,
            actor.to_audit_actor(),
            cause,
        ) {
            Ok(transition) => {
                let event_id: i64 = store
                    .persist_user_transition(&transition)
                    .map_err(translate_persistence_error)?;
                info!(user_id, %today, event_id, "Withdrawal accepted");
                WithdrawalOutcome::Accepted {
                    withdrawal_date: today,
                    event_id,
                }
            }
            Err(CoreError::NotEligible { decision }) => {
                info!(
                    user_id,
                    %today,
                    reason_code = %decision.reason_code,
                    next_eligible_date = %decision.next_eligible_date,
                    "Withdrawal rejected"
                );
                WithdrawalOutcome::rejected(&decision, &state.withdrawal)
            }
            Err(other) => return Err(translate_core_error(other)),
        };
        drop(store);
        drop(user_guard);

        Ok(outcome)
    }

    // ========================================================================
    // User directory
    // ========================================================================

    /// Registers a user with the default withdrawal state.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not an administrator
    /// - The display name is blank
    /// - The store fails
    pub fn register_user(
        &self,
        request: &RegisterUserRequest,
        actor: &AuthenticatedActor,
        cause: Cause,
    ) -> Result<RegisterUserResponse, ApiError> {
        AuthorizationService::authorize_register_user(actor)?;
        let display_name: String =
            validate_user_name(&request.display_name).map_err(translate_domain_error)?;

        let audit_actor: Actor = actor.to_audit_actor();
        let details: String = format!("Registered user '{display_name}'");
        let (user_id, event_id): (i64, i64) = self
            .store()?
            .register_user(&display_name, |user_id| {
                AuditEvent::new(
                    audit_actor,
                    cause,
                    Action::new(String::from("RegisterUser"), Some(details)),
                    StateSnapshot::new(String::from("none")),
                    UserState::new(user_id, UserWithdrawalState::new()).to_snapshot(),
                    AuditScope::User(user_id),
                )
            })
            .map_err(translate_persistence_error)?;

        info!(actor_id = %actor.id, user_id, event_id, "Registered user");

        Ok(RegisterUserResponse {
            user_id,
            message: format!("Registered user '{display_name}' with id {user_id}"),
            display_name,
        })
    }

    /// Lists users, optionally only restricted or only unrestricted ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn list_users(&self, restricted: Option<bool>) -> Result<ListUsersResponse, ApiError> {
        let records: Vec<UserRecord> = self
            .store()?
            .list_users(restricted)
            .map_err(translate_persistence_error)?;
        Ok(ListUsersResponse {
            users: records.into_iter().map(UserSummary::from).collect(),
        })
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Returns the audit trail, optionally for one user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if `user_id` names no user.
    pub fn get_audit_timeline(
        &self,
        user_id: Option<i64>,
    ) -> Result<AuditTimelineResponse, ApiError> {
        let mut store: MutexGuard<'_, Persistence> = self.store()?;
        if let Some(id) = user_id {
            let exists: bool = store.user_exists(id).map_err(translate_persistence_error)?;
            if !exists {
                return Err(translate_persistence_error(PersistenceError::UserNotFound(
                    id,
                )));
            }
        }
        let events: Vec<AuditEvent> = store
            .get_audit_timeline(user_id)
            .map_err(translate_persistence_error)?;
        drop(store);

        Ok(AuditTimelineResponse {
            events: events.into_iter().map(AuditEventView::from).collect(),
        })
    }

    /// Returns one audit event.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` if the event does not exist.
    pub fn get_audit_event(&self, event_id: i64) -> Result<AuditEventView, ApiError> {
        let event: AuditEvent = self
            .store()?
            .get_audit_event(event_id)
            .map_err(translate_persistence_error)?;
        Ok(AuditEventView::from(event))
    }
}

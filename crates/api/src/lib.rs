// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the withdrawal gate.
//!
//! Translates requests into domain values, enforces authorization, applies
//! core commands and persists the results. Transport is not handled here.

mod auth;
mod clock;
mod error;
mod request_response;
mod service;
mod user_locks;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use request_response::{
    AuditEventView, AuditTimelineResponse, BankDetails, BulkRestrictionRequest,
    BulkRestrictionResponse, CryptoDetails, ListUsersResponse, OverviewResponse,
    RegisterUserRequest, RegisterUserResponse, SetWithdrawalScheduleRequest,
    SetWithdrawalScheduleResponse, UserOverview, UserSummary, WithdrawRequest, WithdrawalOutcome,
    WithdrawalScheduleView, WithdrawalSettings, WithdrawalSettingsResponse,
};
pub use service::WithdrawalService;
pub use user_locks::{UserLockHandle, UserLocks};

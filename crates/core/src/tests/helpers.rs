// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::UserState;
use time::{Date, Month};
use withdrawal_gate_audit::{Actor, Cause};
use withdrawal_gate_domain::{
    CryptoTransfer, IntervalDays, RestrictionReason, UserWithdrawalState, WithdrawalRequest,
    WithdrawalSchedule, validate_withdrawal_request,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

/// Wednesday, 2026-03-04.
pub fn wednesday() -> Date {
    Date::from_calendar_date(2026, Month::March, 4).expect("Valid test date")
}

pub fn every(days: i64) -> WithdrawalSchedule {
    WithdrawalSchedule::Interval(IntervalDays::new(days).expect("Valid interval"))
}

pub fn reason(text: &str) -> RestrictionReason {
    RestrictionReason::new(text).expect("Valid reason")
}

pub fn fresh_user(user_id: i64) -> UserState {
    UserState::new(user_id, UserWithdrawalState::new())
}

pub fn create_test_request() -> WithdrawalRequest {
    let crypto: CryptoTransfer = CryptoTransfer {
        crypto_wallet: String::from("BTC"),
        wallet_address: String::from("bc1qexampleaddress9876"),
    };
    validate_withdrawal_request(25.0, "crypto", None, Some(&crypto)).expect("Valid request")
}

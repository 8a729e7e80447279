// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::{Arc, Mutex};
use time::{Date, Duration, Month};
use withdrawal_gate_audit::Cause;
use withdrawal_gate_persistence::Persistence;

use crate::{
    AuthenticatedActor, BankDetails, Clock, CryptoDetails, RegisterUserRequest, Role,
    SetWithdrawalScheduleRequest, WithdrawRequest, WithdrawalService,
};

/// A clock tests can move.
#[derive(Clone)]
pub struct ManualClock {
    date: Arc<Mutex<Date>>,
}

impl ManualClock {
    pub fn new(date: Date) -> Self {
        Self {
            date: Arc::new(Mutex::new(date)),
        }
    }

    pub fn advance(&self, days: i64) {
        let mut date: std::sync::MutexGuard<'_, Date> = self.date.lock().unwrap();
        *date = date.saturating_add(Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn today(&self) -> Date {
        *self.date.lock().unwrap()
    }
}

/// Tuesday, 2026-03-03.
pub fn tuesday() -> Date {
    Date::from_calendar_date(2026, Month::March, 3).expect("Valid test date")
}

/// Wednesday, 2026-03-04.
pub fn wednesday() -> Date {
    Date::from_calendar_date(2026, Month::March, 4).expect("Valid test date")
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn service_with_clock(clock: ManualClock) -> WithdrawalService {
    let persistence: Persistence = Persistence::new_in_memory().expect("In-memory database");
    WithdrawalService::new(persistence, Box::new(clock)).expect("Service starts")
}

/// Registers the named users and returns their identifiers in order.
pub fn register_users(service: &WithdrawalService, names: &[&str]) -> Vec<i64> {
    names
        .iter()
        .map(|name| {
            service
                .register_user(
                    &RegisterUserRequest {
                        display_name: (*name).to_string(),
                    },
                    &create_test_admin(),
                    create_test_cause(),
                )
                .expect("User registered")
                .user_id
        })
        .collect()
}

/// A service on `date` with the named users registered.
pub fn service_with_users(
    date: Date,
    names: &[&str],
) -> (WithdrawalService, ManualClock, Vec<i64>) {
    let clock: ManualClock = ManualClock::new(date);
    let service: WithdrawalService = service_with_clock(clock.clone());
    let ids: Vec<i64> = register_users(&service, names);
    (service, clock, ids)
}

pub fn interval_schedule(days: i64) -> SetWithdrawalScheduleRequest {
    SetWithdrawalScheduleRequest {
        schedule_type: String::from("interval"),
        days_of_week: None,
        interval_days: Some(days),
    }
}

pub fn weekday_schedule(days: &[i64]) -> SetWithdrawalScheduleRequest {
    SetWithdrawalScheduleRequest {
        schedule_type: String::from("daysOfWeek"),
        days_of_week: Some(days.to_vec()),
        interval_days: None,
    }
}

pub fn use_interval(service: &WithdrawalService, days: i64) {
    service
        .set_withdrawal_schedule(
            &interval_schedule(days),
            &create_test_admin(),
            create_test_cause(),
        )
        .expect("Schedule replaced");
}

pub fn crypto_request() -> WithdrawRequest {
    WithdrawRequest {
        amount: 250.0,
        method: String::from("crypto"),
        bank: None,
        crypto: Some(CryptoDetails {
            crypto_wallet: String::from("BTC"),
            wallet_address: String::from("bc1qexampleaddress9876"),
        }),
    }
}

pub fn bank_request() -> WithdrawRequest {
    WithdrawRequest {
        amount: 1200.5,
        method: String::from("bank"),
        bank: Some(BankDetails {
            bank: String::from("First Bank"),
            account_number: String::from("12345678"),
            reference: Some(String::from("rent")),
            ..BankDetails::default()
        }),
        crypto: None,
    }
}

pub fn withdraw_cause(user_id: i64) -> Cause {
    Cause::new(format!("withdraw-{user_id}"), String::from("Withdrawal submission"))
}

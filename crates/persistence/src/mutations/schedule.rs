// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;
use withdrawal_gate::ScheduleSnapshot;
use withdrawal_gate_domain::WithdrawalSchedule;

use crate::diesel_schema::withdrawal_schedule;
use crate::error::PersistenceError;
use crate::queries::schedule::{SCHEDULE_ROW_ID, current_version, find_schedule};

/// The stored column values of a schedule.
struct ScheduleColumns {
    schedule_type: &'static str,
    days_of_week: Option<String>,
    interval_days: Option<i32>,
}

impl ScheduleColumns {
    fn from_schedule(schedule: &WithdrawalSchedule) -> Self {
        match schedule {
            WithdrawalSchedule::DaysOfWeek(days) => Self {
                schedule_type: schedule.kind().as_str(),
                days_of_week: Some(
                    days.numbers()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<String>>()
                        .join(","),
                ),
                interval_days: None,
            },
            WithdrawalSchedule::Interval(interval) => Self {
                schedule_type: schedule.kind().as_str(),
                days_of_week: None,
                interval_days: Some(i32::from(interval.days())),
            },
        }
    }
}

/// Loads the schedule, writing the initial one first if none is stored.
///
/// # Errors
///
/// Returns an error if the query or insert fails.
pub fn load_or_seed_schedule(
    conn: &mut SqliteConnection,
) -> Result<ScheduleSnapshot, PersistenceError> {
    if let Some(snapshot) = find_schedule(conn)? {
        return Ok(snapshot);
    }

    let initial: ScheduleSnapshot = ScheduleSnapshot::initial();
    let columns: ScheduleColumns = ScheduleColumns::from_schedule(&initial.schedule);

    diesel::insert_into(withdrawal_schedule::table)
        .values((
            withdrawal_schedule::schedule_id.eq(SCHEDULE_ROW_ID),
            withdrawal_schedule::version.eq(initial.version),
            withdrawal_schedule::schedule_type.eq(columns.schedule_type),
            withdrawal_schedule::days_of_week.eq(columns.days_of_week),
            withdrawal_schedule::interval_days.eq(columns.interval_days),
        ))
        .execute(conn)?;

    info!(schedule = %initial.schedule, "Seeded default withdrawal schedule");
    Ok(initial)
}

/// Replaces the stored schedule with `snapshot`.
///
/// The write only succeeds when the stored version is exactly one below the
/// new snapshot's version.
///
/// # Errors
///
/// Returns `PersistenceError::ScheduleVersionConflict` if the stored version
/// does not precede the new one, or an error if the update fails.
pub fn replace_schedule(
    conn: &mut SqliteConnection,
    snapshot: &ScheduleSnapshot,
) -> Result<(), PersistenceError> {
    let expected: i64 = snapshot.version - 1;
    let columns: ScheduleColumns = ScheduleColumns::from_schedule(&snapshot.schedule);

    let updated: usize = diesel::update(
        withdrawal_schedule::table
            .filter(withdrawal_schedule::schedule_id.eq(SCHEDULE_ROW_ID))
            .filter(withdrawal_schedule::version.eq(expected)),
    )
    .set((
        withdrawal_schedule::version.eq(snapshot.version),
        withdrawal_schedule::schedule_type.eq(columns.schedule_type),
        withdrawal_schedule::days_of_week.eq(columns.days_of_week),
        withdrawal_schedule::interval_days.eq(columns.interval_days),
        withdrawal_schedule::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
            "CURRENT_TIMESTAMP",
        )),
    ))
    .execute(conn)?;

    if updated == 0 {
        let found: i64 = current_version(conn)?;
        return Err(PersistenceError::ScheduleVersionConflict { expected, found });
    }

    Ok(())
}

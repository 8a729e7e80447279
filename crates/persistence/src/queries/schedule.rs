// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use withdrawal_gate::ScheduleSnapshot;
use withdrawal_gate_domain::{WithdrawalSchedule, validate_schedule};

use crate::diesel_schema::withdrawal_schedule;
use crate::error::PersistenceError;

/// The only row id the schedule table permits.
pub const SCHEDULE_ROW_ID: i32 = 1;

#[derive(Queryable, Selectable)]
#[diesel(table_name = withdrawal_schedule)]
struct ScheduleRow {
    version: i64,
    schedule_type: String,
    days_of_week: Option<String>,
    interval_days: Option<i32>,
}

/// Loads the stored schedule, if one has been written.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row no longer
/// describes a valid schedule.
pub fn find_schedule(
    conn: &mut SqliteConnection,
) -> Result<Option<ScheduleSnapshot>, PersistenceError> {
    let row: Option<ScheduleRow> = withdrawal_schedule::table
        .filter(withdrawal_schedule::schedule_id.eq(SCHEDULE_ROW_ID))
        .select(ScheduleRow::as_select())
        .first::<ScheduleRow>(conn)
        .optional()?;

    row.as_ref().map(reconstruct_snapshot).transpose()
}

/// Returns the stored schedule version.
///
/// # Errors
///
/// Returns an error if the query fails or no schedule exists.
pub fn current_version(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    withdrawal_schedule::table
        .filter(withdrawal_schedule::schedule_id.eq(SCHEDULE_ROW_ID))
        .select(withdrawal_schedule::version)
        .first::<i64>(conn)
        .map_err(PersistenceError::from)
}

fn reconstruct_snapshot(row: &ScheduleRow) -> Result<ScheduleSnapshot, PersistenceError> {
    let days: Option<Vec<i64>> = row
        .days_of_week
        .as_deref()
        .map(parse_day_list)
        .transpose()?;

    let schedule: WithdrawalSchedule = validate_schedule(
        &row.schedule_type,
        days.as_deref(),
        row.interval_days.map(i64::from),
    )
    .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    Ok(ScheduleSnapshot::new(row.version, schedule))
}

fn parse_day_list(value: &str) -> Result<Vec<i64>, PersistenceError> {
    value
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim().parse::<i64>().map_err(|e| {
                PersistenceError::ReconstructionError(format!("Invalid weekday '{part}': {e}"))
            })
        })
        .collect()
}

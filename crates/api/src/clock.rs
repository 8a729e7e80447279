// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Source of "today".
//!
//! Eligibility is a function of a calendar date. The date is read from a
//! `Clock` at call time so tests can pin it and the server can choose the
//! business-day boundary.

use time::{Date, OffsetDateTime, UtcOffset};

/// Supplies the current business date.
pub trait Clock: Send + Sync {
    /// Returns today's date.
    fn today(&self) -> Date;
}

/// Reads the system clock and converts to a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Creates a clock whose day boundary is at midnight in `offset`.
    #[must_use]
    pub const fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// A clock whose day boundary is midnight UTC.
    #[must_use]
    pub const fn utc() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: Date,
}

impl FixedClock {
    /// Creates a clock pinned to `date`.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.date
    }
}

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

//! Pure state transitions.
//!
//! Every state change goes through a `Command`. Applying a command never
//! touches storage: it returns the new state together with the audit event
//! describing the change, and the caller persists both.

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply, apply_schedule};
pub use command::Command;
pub use error::CoreError;
pub use state::{ScheduleSnapshot, ScheduleTransition, TransitionResult, UserState};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `audit` - Audit event persistence
//! - `schedule` - Seeding and replacing the global schedule
//! - `users` - User directory and per-user withdrawal state
//! - `transitions` - Transactional persistence of core transitions

pub mod audit;
pub mod schedule;
pub mod transitions;
pub mod users;

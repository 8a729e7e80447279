// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific helpers.
//!
//! Everything that cannot be expressed in Diesel DSL (PRAGMA statements,
//! `last_insert_rowid()`, migration execution) lives here so queries and
//! mutations stay in plain DSL.

pub mod sqlite;

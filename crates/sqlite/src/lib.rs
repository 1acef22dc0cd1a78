// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` driver backend for the rowmut mutation engine.
//!
//! Implements the engine's driver traits on top of `rusqlite`:
//!
//! - [`SqliteSession`] wraps one `rusqlite::Connection` and hands out live
//!   prepared statements. `SQLite` allows several prepared statements against
//!   one connection, which multi-table statement groups rely on.
//! - [`SqliteStatement`] buffers 0-based engine binds, translates them to
//!   `SQLite`'s 1-based convention on execution, and emulates statement
//!   batching by replaying queued rows (`SQLite` has no native batch API).
//!
//! ## Invariants
//!
//! - Foreign key enforcement is switched on and verified at session
//!   construction; a connection where the pragma does not stick is refused.
//! - Generated keys are read via `last_insert_rowid()` immediately after the
//!   insert, on the same connection, before any other statement runs.
//! - `SQLite` has no stored procedures, so callable statements are prepared
//!   as ordinary statements.

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

mod session;
mod statement;

#[cfg(test)]
mod tests;

pub use session::SqliteSession;
pub use statement::SqliteStatement;

use rowmut_engine::DriverError;

/// Converts a `rusqlite` error into the engine's driver error, carrying the
/// extended result code when `SQLite` reported one.
pub(crate) fn driver_error(error: &rusqlite::Error) -> DriverError {
    match error {
        rusqlite::Error::SqliteFailure(cause, _) => {
            DriverError::with_code(error.to_string(), cause.extended_code)
        }
        _ => DriverError::new(error.to_string()),
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Multi-table mutation execution engine.
//!
//! This crate turns one logical write (insert/update/delete of one domain
//! entity) into correctly ordered, correctly batched, correctly parameterized
//! SQL statements against potentially several physical tables, honoring
//! row-count expectations and identity-generation constraints.
//!
//! ## Architecture
//!
//! - `driver` — the narrow abstraction over the SQL driver (prepare, bind,
//!   execute, read update count). Backends such as `rowmut-sqlite` implement
//!   these traits; the engine never touches a concrete driver.
//! - `statement_group` — lazily prepares and owns the live driver statements
//!   for one mutation group, one per non-skipped table.
//! - `binding` — parameter binders in normal (bind-on-call) and grouped
//!   (accumulate-then-flush) variants, each with a single-table
//!   specialization.
//! - `skip` — pure resolution of which non-primary tables can be omitted for
//!   a given row.
//! - `executor` — orchestration: skip resolution, statement acquisition,
//!   binding, execution (direct or batched), expectation checks. Selected
//!   once per logical-write request from the group shape and the effective
//!   batch size.
//!
//! ## Concurrency
//!
//! One executor, one statement group, and one binder are owned by a single
//! session for the duration of one logical write (or one batch) and are used
//! serially. Nothing in this crate is shared across threads and no internal
//! locking exists.
//!
//! ## Error Handling
//!
//! Driver failures surface as [`EngineError`] values carrying the offending
//! SQL text (and parameter position/value for bind failures). A wrong
//! affected-row count is a distinct semantic failure
//! ([`EngineError::ExpectationMismatch`]) used to detect optimistic-lock
//! conflicts. A missing statement for a skipped table is valid control flow,
//! never an error. The engine does not retry; all failures propagate to the
//! caller.

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

mod binding;
mod config;
mod driver;
mod error;
mod executor;
mod skip;
mod statement_group;

#[cfg(test)]
mod tests;

pub use binding::{Binding, BindingGroup, ParameterBinder};
pub use config::{EngineConfig, SessionSettings, effective_batch_size};
pub use driver::{
    DriverError, DriverSession, DriverStatement, GeneratedKey, SqlValue, StatementKind,
};
pub use error::EngineError;
pub use executor::{
    BatchedExecutor, ExecutionOutcome, ExecutorKind, MutationExecutor, PostInsertExecutor,
    UnbatchedExecutor, select_executor_kind,
};
pub use skip::{TableSkips, determine_tables_to_skip};
pub use statement_group::{PreparedStatementDetails, PreparedStatementGroup};

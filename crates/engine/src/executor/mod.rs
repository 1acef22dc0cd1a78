// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation executors.
//!
//! An executor orchestrates one logical write end to end: skip resolution,
//! statement acquisition, parameter binding, execution (direct or via batch),
//! and expectation checks. The variant is selected once per logical-write
//! request, never re-evaluated per row or per bound parameter:
//!
//! 1. An INSERT against a target with an identity-insert delegate always uses
//!    the post-insert executor; that path is never batched because the
//!    generated key must be read back before dependent tables can be bound.
//! 2. Otherwise the effective batch size (session override, else global
//!    default) decides batched vs. unbatched, each with a single-table
//!    specialization when the target maps to exactly one table.
//!
//! ## Calling protocol
//!
//! `resolve_skips` first (before any statement is prepared), then
//! `bind_parameter` per value, then `execute`. Batched executors accumulate
//! rows and physically execute on `flush` or when the batch fills;
//! `release` flushes and closes everything.

mod batched;
mod post_insert;
mod unbatched;

pub use batched::BatchedExecutor;
pub use post_insert::PostInsertExecutor;
pub use unbatched::UnbatchedExecutor;

use rowmut_model::{MutationGroup, MutationType, TableMutation};
use tracing::debug;

use crate::config::{EngineConfig, SessionSettings, effective_batch_size};
use crate::driver::{DriverSession, SqlValue};
use crate::error::EngineError;

/// The closed set of executor strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorKind {
    /// Identity-insert path: execute the root insert, read the generated key
    /// back, then the dependent tables. Never batched.
    PostInsert,
    /// Batched execution against a single table.
    BatchedSingleTable,
    /// Batched execution against multiple tables.
    BatchedMultiTable,
    /// Direct execution against a single table.
    UnbatchedSingleTable,
    /// Direct execution against multiple tables.
    UnbatchedMultiTable,
}

/// Selects the executor strategy for one logical-write request.
///
/// Pure; evaluated once per request.
#[must_use]
pub fn select_executor_kind(
    group: &MutationGroup,
    config: &EngineConfig,
    settings: &SessionSettings,
) -> ExecutorKind {
    if group.mutation_type() == MutationType::Insert && group.target().uses_generated_id() {
        return ExecutorKind::PostInsert;
    }
    let single_table = group.target().table_count() == 1;
    if effective_batch_size(config, settings) > 1 {
        if single_table {
            ExecutorKind::BatchedSingleTable
        } else {
            ExecutorKind::BatchedMultiTable
        }
    } else if single_table {
        ExecutorKind::UnbatchedSingleTable
    } else {
        ExecutorKind::UnbatchedMultiTable
    }
}

/// What `execute` produced for one logical write.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Every statement executed directly and passed its expectation.
    Completed,
    /// The row was queued into the statement batch; expectations are checked
    /// at flush time.
    Batched,
    /// The insert executed and the database generated this identifier.
    GeneratedId(SqlValue),
}

/// A mutation executor for one logical write (or one batch of them).
#[derive(Debug)]
pub enum MutationExecutor<'g, 's> {
    /// Direct execution.
    Unbatched(UnbatchedExecutor<'g, 's>),
    /// Accumulating execution across logical writes.
    Batched(BatchedExecutor<'g, 's>),
    /// Identity-insert execution.
    PostInsert(PostInsertExecutor<'g, 's>),
}

impl<'g, 's> MutationExecutor<'g, 's> {
    /// Creates the executor selected for this group, configuration, and
    /// session.
    #[must_use]
    pub fn new(
        group: &'g MutationGroup,
        session: &'s dyn DriverSession,
        config: &EngineConfig,
        settings: &SessionSettings,
    ) -> Self {
        let kind = select_executor_kind(group, config, settings);
        debug!(
            entity = group.target().entity_name(),
            mutation_type = %group.mutation_type(),
            kind = ?kind,
            "Selected mutation executor"
        );
        match kind {
            ExecutorKind::PostInsert => {
                Self::PostInsert(PostInsertExecutor::new(group, session, config))
            }
            ExecutorKind::BatchedSingleTable | ExecutorKind::BatchedMultiTable => {
                Self::Batched(BatchedExecutor::new(
                    kind,
                    group,
                    session,
                    config,
                    effective_batch_size(config, settings),
                ))
            }
            ExecutorKind::UnbatchedSingleTable | ExecutorKind::UnbatchedMultiTable => {
                Self::Unbatched(UnbatchedExecutor::new(kind, group, session, config))
            }
        }
    }

    /// The strategy this executor implements.
    #[must_use]
    pub const fn kind(&self) -> ExecutorKind {
        match self {
            Self::Unbatched(executor) => executor.kind(),
            Self::Batched(executor) => executor.kind(),
            Self::PostInsert(_) => ExecutorKind::PostInsert,
        }
    }

    /// Resolves the skip set for the next row. Must be called before any
    /// parameter is bound.
    ///
    /// # Errors
    ///
    /// Returns an error if a batched executor must flush a differently shaped
    /// in-flight batch and that flush fails.
    pub fn resolve_skips<F>(&mut self, skip_checker: F) -> Result<(), EngineError>
    where
        F: FnMut(&TableMutation) -> bool,
    {
        match self {
            Self::Unbatched(executor) => {
                executor.resolve_skips(skip_checker);
                Ok(())
            }
            Self::Batched(executor) => executor.resolve_skips(skip_checker),
            Self::PostInsert(executor) => {
                executor.resolve_skips(skip_checker);
                Ok(())
            }
        }
    }

    /// Binds one parameter value for the current row.
    ///
    /// Returns `Ok(false)` when the table is skipped or not part of the
    /// group.
    ///
    /// # Errors
    ///
    /// Returns an error if statement preparation or a driver bind fails.
    pub fn bind_parameter(
        &mut self,
        table_name: &str,
        column: &str,
        position: usize,
        value: SqlValue,
    ) -> Result<bool, EngineError> {
        match self {
            Self::Unbatched(executor) => executor.bind_parameter(table_name, column, position, value),
            Self::Batched(executor) => executor.bind_parameter(table_name, column, position, value),
            Self::PostInsert(executor) => {
                executor.bind_parameter(table_name, column, position, value)
            }
        }
    }

    /// Executes the current row.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or expectation violation; batched
    /// executors defer expectation checks to flush time.
    pub fn execute(&mut self) -> Result<ExecutionOutcome, EngineError> {
        match self {
            Self::Unbatched(executor) => executor.execute(),
            Self::Batched(executor) => executor.execute(),
            Self::PostInsert(executor) => executor.execute(),
        }
    }

    /// Physically executes any accumulated batch. A no-op for unbatched
    /// variants.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or expectation violation of any
    /// queued row.
    pub fn flush(&mut self) -> Result<(), EngineError> {
        match self {
            Self::Batched(executor) => executor.flush(),
            Self::Unbatched(_) | Self::PostInsert(_) => Ok(()),
        }
    }

    /// Flushes any accumulated batch and releases every prepared statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails; statements are released
    /// regardless.
    pub fn release(&mut self) -> Result<(), EngineError> {
        match self {
            Self::Unbatched(executor) => {
                executor.release();
                Ok(())
            }
            Self::Batched(executor) => executor.release(),
            Self::PostInsert(executor) => {
                executor.release();
                Ok(())
            }
        }
    }
}

/// Checks a driver-reported row count against a statement's expectation.
fn verify_row_count(
    mutation: &TableMutation,
    actual: u64,
) -> Result<(), EngineError> {
    let expectation = mutation.expectation();
    if expectation.matches(actual) {
        return Ok(());
    }
    Err(EngineError::ExpectationMismatch {
        table_name: mutation.table_name().to_string(),
        sql: mutation.sql().to_string(),
        expected: expectation.expected_count().unwrap_or_default(),
        actual,
    })
}

/// Group positions in execution order: ascending table index for inserts and
/// updates, descending for deletes (dependents before parents).
fn visit_positions(group: &MutationGroup) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..group.len()).collect();
    if group.mutation_type().executes_in_reverse_order() {
        positions.reverse();
    }
    positions
}

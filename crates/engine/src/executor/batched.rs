// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rowmut_model::{MutationGroup, TableMutation};
use tracing::debug;

use crate::binding::ParameterBinder;
use crate::config::EngineConfig;
use crate::driver::{DriverSession, SqlValue};
use crate::error::EngineError;
use crate::executor::{ExecutionOutcome, ExecutorKind, verify_row_count, visit_positions};
use crate::skip::{TableSkips, determine_tables_to_skip};
use crate::statement_group::PreparedStatementGroup;

/// Batched mutation execution.
///
/// Rows are queued onto the prepared statements via the driver's batch
/// facility and physically executed together, reducing round trips.
/// Expectations are checked per queued row from the batch update counts.
///
/// A statement batch requires a uniform bind shape per statement, so a row
/// whose skip set differs from the rows already queued forces a flush before
/// it is bound. Insertion order into the batch is preserved across logical
/// writes.
#[derive(Debug)]
pub struct BatchedExecutor<'g, 's> {
    kind: ExecutorKind,
    group: &'g MutationGroup,
    statements: PreparedStatementGroup<'g, 's>,
    binder: ParameterBinder,
    skips: TableSkips,
    batch_size: usize,
    queued_rows: usize,
    batch_shape: TableSkips,
}

impl<'g, 's> BatchedExecutor<'g, 's> {
    pub(crate) fn new(
        kind: ExecutorKind,
        group: &'g MutationGroup,
        session: &'s dyn DriverSession,
        config: &EngineConfig,
        batch_size: usize,
    ) -> Self {
        Self {
            kind,
            group,
            statements: PreparedStatementGroup::for_group(group, session),
            binder: ParameterBinder::select(group, config.log_parameter_bindings),
            skips: TableSkips::none(),
            batch_size,
            queued_rows: 0,
            batch_shape: TableSkips::none(),
        }
    }

    /// The strategy this executor implements.
    #[must_use]
    pub const fn kind(&self) -> ExecutorKind {
        self.kind
    }

    /// The number of rows currently queued and not yet flushed.
    #[must_use]
    pub const fn queued_rows(&self) -> usize {
        self.queued_rows
    }

    /// Resolves the skip set for the next row.
    ///
    /// If the in-flight batch was built with a different skip set, it is
    /// flushed first: the new row's bind shape would not line up with the
    /// rows already queued on the shared statements.
    ///
    /// # Errors
    ///
    /// Returns an error if the forced flush fails.
    pub fn resolve_skips<F>(&mut self, skip_checker: F) -> Result<(), EngineError>
    where
        F: FnMut(&TableMutation) -> bool,
    {
        let skips = determine_tables_to_skip(self.group, skip_checker);
        if self.queued_rows > 0 && skips != self.batch_shape {
            debug!(
                queued_rows = self.queued_rows,
                "Skip set changed; flushing in-flight batch"
            );
            self.flush()?;
        }
        self.skips = skips;
        Ok(())
    }

    /// Binds one parameter value for the current row.
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
        self.binder.bind(
            table_name,
            column,
            position,
            value,
            &mut self.statements,
            &self.skips,
        )
    }

    /// Queues the current row onto the batch, flushing if the batch fills.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure, or on expectation violation when
    /// the queue reaches the batch size and is flushed.
    pub fn execute(&mut self) -> Result<ExecutionOutcome, EngineError> {
        let group = self.group;
        for position in visit_positions(group) {
            let Some(mutation) = group.at_position(position) else {
                continue;
            };
            if self.skips.contains(mutation.table_index()) {
                continue;
            }
            let table_name = mutation.table_name();
            if !self
                .binder
                .before_statement(table_name, &mut self.statements, &self.skips)?
            {
                continue;
            }
            let Some(details) = self.statements.details_mut(table_name, &self.skips)? else {
                continue;
            };
            let sql = details.sql();
            details
                .statement_mut()
                .add_batch()
                .map_err(|source| EngineError::batch(sql, source))?;
        }
        self.binder.after_row();
        self.batch_shape = self.skips.clone();
        self.queued_rows += 1;
        if self.queued_rows >= self.batch_size {
            self.flush()?;
        }
        Ok(ExecutionOutcome::Batched)
    }

    /// Physically executes every queued row and checks expectations.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or expectation violation of any
    /// queued row.
    pub fn flush(&mut self) -> Result<(), EngineError> {
        if self.queued_rows == 0 {
            return Ok(());
        }
        let rows = self.queued_rows;
        self.statements.for_each_statement(|details| {
            let sql = details.sql();
            let row_counts = details
                .statement_mut()
                .execute_batch()
                .map_err(|source| EngineError::batch(sql, source))?;
            for row_count in row_counts {
                verify_row_count(details.mutation(), row_count)?;
            }
            Ok(())
        })?;
        self.queued_rows = 0;
        self.batch_shape = TableSkips::none();
        debug!(rows, "Flushed statement batch");
        Ok(())
    }

    /// Flushes any queued rows, then releases every prepared statement.
    ///
    /// Statements are released even when the final flush fails.
    ///
    /// # Errors
    ///
    /// Returns the flush error, if any.
    pub fn release(&mut self) -> Result<(), EngineError> {
        let flushed = self.flush();
        self.statements.release();
        self.binder.after_row();
        flushed
    }
}

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

/// Direct (unbatched) mutation execution.
///
/// Each non-skipped table statement is prepared, bound, executed, and
/// expectation-checked within `execute`, in mutation-type order.
#[derive(Debug)]
pub struct UnbatchedExecutor<'g, 's> {
    kind: ExecutorKind,
    group: &'g MutationGroup,
    statements: PreparedStatementGroup<'g, 's>,
    binder: ParameterBinder,
    skips: TableSkips,
}

impl<'g, 's> UnbatchedExecutor<'g, 's> {
    pub(crate) fn new(
        kind: ExecutorKind,
        group: &'g MutationGroup,
        session: &'s dyn DriverSession,
        config: &EngineConfig,
    ) -> Self {
        Self {
            kind,
            group,
            statements: PreparedStatementGroup::for_group(group, session),
            binder: ParameterBinder::select(group, config.log_parameter_bindings),
            skips: TableSkips::none(),
        }
    }

    /// The strategy this executor implements.
    #[must_use]
    pub const fn kind(&self) -> ExecutorKind {
        self.kind
    }

    /// Resolves the skip set for the current row.
    pub fn resolve_skips<F>(&mut self, skip_checker: F)
    where
        F: FnMut(&TableMutation) -> bool,
    {
        self.skips = determine_tables_to_skip(self.group, skip_checker);
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

    /// Executes every non-skipped table statement and checks its expectation.
    ///
    /// # Errors
    ///
    /// Returns an error on driver failure or expectation violation.
    pub fn execute(&mut self) -> Result<ExecutionOutcome, EngineError> {
        let group = self.group;
        for position in visit_positions(group) {
            let Some(mutation) = group.at_position(position) else {
                continue;
            };
            if self.skips.contains(mutation.table_index()) {
                debug!(table = mutation.table_name(), "Skipping table for this row");
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
            let row_count = details
                .statement_mut()
                .execute()
                .map_err(|source| EngineError::execute(sql, source))?;
            verify_row_count(details.mutation(), row_count)?;
        }
        self.binder.after_row();
        Ok(ExecutionOutcome::Completed)
    }

    /// Releases every prepared statement.
    pub fn release(&mut self) {
        self.statements.release();
        self.binder.after_row();
    }
}

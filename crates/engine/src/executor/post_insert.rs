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
use crate::executor::{ExecutionOutcome, verify_row_count};
use crate::skip::{TableSkips, determine_tables_to_skip};
use crate::statement_group::PreparedStatementGroup;

/// Identity-insert execution.
///
/// The identifier table's INSERT executes first, out of band from any
/// batching, through the driver's generated-key path; the captured key is
/// then bound into every dependent table's key columns before those tables
/// execute in ascending table-index order.
#[derive(Debug)]
pub struct PostInsertExecutor<'g, 's> {
    group: &'g MutationGroup,
    statements: PreparedStatementGroup<'g, 's>,
    binder: ParameterBinder,
    skips: TableSkips,
}

impl<'g, 's> PostInsertExecutor<'g, 's> {
    pub(crate) fn new(
        group: &'g MutationGroup,
        session: &'s dyn DriverSession,
        config: &EngineConfig,
    ) -> Self {
        Self {
            group,
            statements: PreparedStatementGroup::for_group(group, session),
            binder: ParameterBinder::select(group, config.log_parameter_bindings),
            skips: TableSkips::none(),
        }
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

    /// Executes the identifier-table insert, captures the generated key, and
    /// propagates it through the dependent tables.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownTable`] when the group carries no
    /// mutation for the identifier table, and otherwise any driver failure or
    /// expectation violation.
    pub fn execute(&mut self) -> Result<ExecutionOutcome, EngineError> {
        let group = self.group;
        let identifier_table = group.target().identifier_table_name();

        if !self
            .binder
            .before_statement(identifier_table, &mut self.statements, &self.skips)?
        {
            return Err(EngineError::UnknownTable(identifier_table.to_string()));
        }
        let Some(details) = self.statements.details_mut(identifier_table, &self.skips)? else {
            return Err(EngineError::UnknownTable(identifier_table.to_string()));
        };
        let sql = details.sql();
        let generated = details
            .statement_mut()
            .execute_returning_generated_key()
            .map_err(|source| EngineError::execute(sql, source))?;
        verify_row_count(details.mutation(), generated.row_count)?;
        debug!(
            entity = group.target().entity_name(),
            key = ?generated.key,
            "Captured generated identifier"
        );

        for position in 0..group.len() {
            let Some(mutation) = group.at_position(position) else {
                continue;
            };
            if mutation.table_name() == identifier_table
                || self.skips.contains(mutation.table_index())
            {
                continue;
            }
            let table_name = mutation.table_name();
            if let Some(key_params) = mutation.key_value_params() {
                for (column, key_position) in key_params.iter() {
                    self.binder.bind(
                        table_name,
                        column,
                        key_position,
                        generated.key.clone(),
                        &mut self.statements,
                        &self.skips,
                    )?;
                }
            }
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
        Ok(ExecutionOutcome::GeneratedId(generated.key))
    }

    /// Releases every prepared statement.
    pub fn release(&mut self) {
        self.statements.release();
        self.binder.after_row();
    }
}

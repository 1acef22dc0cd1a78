// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parameter binders.
//!
//! Binders accumulate parameter values and commit them onto the live
//! statement before execution. Two orthogonal axes exist:
//!
//! - **Normal vs. grouped** — normal binders apply each value to the live
//!   statement the moment it is bound (minimal overhead, the default).
//!   Grouped binders accumulate bindings into a per-table [`BindingGroup`]
//!   and apply them all, in position order, inside `before_statement`; this
//!   allows a deterministic, fully-resolved log line for the entire row
//!   before execution and is selected only when parameter logging is enabled.
//! - **Single-table vs. multi-table** — single-table variants skip the
//!   table-name keyed lookup entirely.
//!
//! Contract for all variants: `before_statement` returns `Ok(false)` when no
//! statement exists for the table (the skip case) and otherwise commits all
//! pending values and clears them. Bindings never leak into a subsequent row;
//! executors call [`ParameterBinder::after_row`] once per logical write to
//! discard leftovers for tables that were never visited.

use rowmut_model::MutationGroup;
use tracing::trace;

use crate::driver::{DriverStatement, SqlValue};
use crate::error::EngineError;
use crate::skip::TableSkips;
use crate::statement_group::PreparedStatementGroup;

/// One pending parameter value within one table's parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    column: String,
    position: usize,
    value: SqlValue,
}

impl Binding {
    /// The column the value belongs to.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The 0-based bind position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The pending value.
    #[must_use]
    pub const fn value(&self) -> &SqlValue {
        &self.value
    }
}

/// The table-scoped ordered set of pending bindings for one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingGroup {
    table_name: String,
    bindings: Vec<Binding>,
}

impl BindingGroup {
    fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            bindings: Vec::new(),
        }
    }

    /// The table this group binds.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The pending bindings, in insertion order until flushed.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Whether no bindings are pending.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The number of pending bindings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bindings.len()
    }

    fn put(&mut self, column: &str, position: usize, value: SqlValue) {
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|binding| binding.position == position)
        {
            existing.column = column.to_string();
            existing.value = value;
        } else {
            self.bindings.push(Binding {
                column: column.to_string(),
                position,
                value,
            });
        }
    }

    /// Commits every pending binding in ascending position order and clears
    /// the group.
    fn apply_to(
        &mut self,
        sql: &str,
        statement: &mut dyn DriverStatement,
    ) -> Result<(), EngineError> {
        self.bindings.sort_by_key(Binding::position);
        for binding in &self.bindings {
            statement
                .bind(binding.position, &binding.value)
                .map_err(|source| {
                    EngineError::bind(sql, binding.position, &binding.value, source)
                })?;
        }
        self.bindings.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// A parameter binder, selected once per executor from the group shape and
/// the parameter-logging toggle.
#[derive(Debug)]
pub enum ParameterBinder {
    /// Bind-on-call against a single-table group.
    SingleTableNormal,
    /// Bind-on-call with table-name keyed statement lookup.
    MultiTableNormal,
    /// Accumulate-then-flush against a single-table group.
    SingleTableGrouped(Option<BindingGroup>),
    /// Accumulate-then-flush with one [`BindingGroup`] per table.
    MultiTableGrouped(Vec<BindingGroup>),
}

impl ParameterBinder {
    /// Selects the binder variant for a mutation group.
    ///
    /// Evaluated once at executor construction, never per bound parameter.
    #[must_use]
    pub fn select(group: &MutationGroup, log_parameter_bindings: bool) -> Self {
        match (group.len() == 1, log_parameter_bindings) {
            (true, false) => Self::SingleTableNormal,
            (false, false) => Self::MultiTableNormal,
            (true, true) => Self::SingleTableGrouped(None),
            (false, true) => Self::MultiTableGrouped(Vec::new()),
        }
    }

    /// Binds one parameter value for a table.
    ///
    /// Returns `Ok(false)` when the table is skipped for the current row or
    /// not part of the group; the value is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if a normal binder's immediate driver bind fails, or
    /// if lazy statement preparation fails.
    pub fn bind(
        &mut self,
        table_name: &str,
        column: &str,
        position: usize,
        value: SqlValue,
        statements: &mut PreparedStatementGroup<'_, '_>,
        skips: &TableSkips,
    ) -> Result<bool, EngineError> {
        match self {
            Self::SingleTableNormal => {
                let Some(details) = statements.single_details_mut(skips)? else {
                    return Ok(false);
                };
                let sql = details.sql();
                details
                    .statement_mut()
                    .bind(position, &value)
                    .map_err(|source| EngineError::bind(sql, position, &value, source))?;
                Ok(true)
            }
            Self::MultiTableNormal => {
                let Some(details) = statements.details_mut(table_name, skips)? else {
                    return Ok(false);
                };
                let sql = details.sql();
                details
                    .statement_mut()
                    .bind(position, &value)
                    .map_err(|source| EngineError::bind(sql, position, &value, source))?;
                Ok(true)
            }
            Self::SingleTableGrouped(pending) => {
                pending
                    .get_or_insert_with(|| BindingGroup::new(table_name))
                    .put(column, position, value);
                Ok(true)
            }
            Self::MultiTableGrouped(pending) => {
                if let Some(group) = pending
                    .iter_mut()
                    .find(|group| group.table_name() == table_name)
                {
                    group.put(column, position, value);
                } else {
                    let mut group = BindingGroup::new(table_name);
                    group.put(column, position, value);
                    pending.push(group);
                }
                Ok(true)
            }
        }
    }

    /// Commits pending values for a table immediately before its execution.
    ///
    /// Returns `Ok(false)` when no statement exists for the table (skipped or
    /// absent); any pending values for it are discarded so they cannot leak
    /// into a later row.
    ///
    /// # Errors
    ///
    /// Returns an error if statement preparation or a driver bind fails.
    pub fn before_statement(
        &mut self,
        table_name: &str,
        statements: &mut PreparedStatementGroup<'_, '_>,
        skips: &TableSkips,
    ) -> Result<bool, EngineError> {
        match self {
            Self::SingleTableNormal => Ok(statements.single_details_mut(skips)?.is_some()),
            Self::MultiTableNormal => Ok(statements.details_mut(table_name, skips)?.is_some()),
            Self::SingleTableGrouped(pending) => {
                let Some(details) = statements.single_details_mut(skips)? else {
                    if let Some(group) = pending.as_mut() {
                        group.clear();
                    }
                    return Ok(false);
                };
                let Some(group) = pending.as_mut() else {
                    return Ok(true);
                };
                log_row(table_name, group);
                let sql = details.sql();
                group.apply_to(sql, details.statement_mut())
                    .map(|()| true)
            }
            Self::MultiTableGrouped(pending) => {
                let Some(details) = statements.details_mut(table_name, skips)? else {
                    if let Some(group) = pending
                        .iter_mut()
                        .find(|group| group.table_name() == table_name)
                    {
                        group.clear();
                    }
                    return Ok(false);
                };
                let Some(group) = pending
                    .iter_mut()
                    .find(|group| group.table_name() == table_name)
                else {
                    return Ok(true);
                };
                log_row(table_name, group);
                let sql = details.sql();
                group.apply_to(sql, details.statement_mut())
                    .map(|()| true)
            }
        }
    }

    /// Discards any bindings left pending after a row, so state never leaks
    /// into the next logical write.
    pub fn after_row(&mut self) {
        match self {
            Self::SingleTableNormal | Self::MultiTableNormal => {}
            Self::SingleTableGrouped(pending) => {
                if let Some(group) = pending.as_mut() {
                    group.clear();
                }
            }
            Self::MultiTableGrouped(pending) => {
                for group in pending.iter_mut() {
                    group.clear();
                }
            }
        }
    }
}

/// Emits the fully resolved row for one table before it is committed.
fn log_row(table_name: &str, group: &mut BindingGroup) {
    group.bindings.sort_by_key(Binding::position);
    trace!(
        table = table_name,
        bindings = ?group.bindings(),
        "Binding mutation row"
    );
}

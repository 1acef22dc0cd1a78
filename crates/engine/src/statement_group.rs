// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The runtime counterpart of a mutation group.
//!
//! A [`PreparedStatementGroup`] lazily prepares and owns the live driver
//! statements for one [`MutationGroup`], one per accessed table. Statements
//! are prepared the first time a table is touched and cached until
//! [`PreparedStatementGroup::release`]; a table that is skipped for the
//! current row, or that is not part of the group at all, yields `None` and is
//! never prepared.

use rowmut_model::{Expectation, MutationGroup, MutationType, TableMutation};
use tracing::debug;

use crate::driver::{DriverSession, DriverStatement, StatementKind};
use crate::error::EngineError;
use crate::skip::TableSkips;

/// One table mutation paired with its live driver statement.
pub struct PreparedStatementDetails<'g, 's> {
    mutation: &'g TableMutation,
    statement: Box<dyn DriverStatement + 's>,
}

impl<'g, 's> PreparedStatementDetails<'g, 's> {
    /// The table mutation this statement was prepared from.
    #[must_use]
    pub const fn mutation(&self) -> &'g TableMutation {
        self.mutation
    }

    /// The physical table name.
    #[must_use]
    pub fn table_name(&self) -> &'g str {
        self.mutation.table_name()
    }

    /// The SQL text of the statement.
    #[must_use]
    pub fn sql(&self) -> &'g str {
        self.mutation.sql()
    }

    /// The affected-row-count contract of the statement.
    #[must_use]
    pub const fn expectation(&self) -> Expectation {
        self.mutation.expectation()
    }

    /// The live driver statement.
    pub fn statement_mut(&mut self) -> &mut (dyn DriverStatement + 's) {
        self.statement.as_mut()
    }
}

impl std::fmt::Debug for PreparedStatementDetails<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStatementDetails")
            .field("table_name", &self.table_name())
            .field("sql", &self.sql())
            .finish_non_exhaustive()
    }
}

/// Lazily prepared driver statements for one mutation group.
///
/// The single-table variant skips position bookkeeping entirely; the standard
/// variant keeps one slot per group position and visits prepared entries in
/// the group's execution order.
pub enum PreparedStatementGroup<'g, 's> {
    /// A group over exactly one table.
    Single(SingleTableStatementGroup<'g, 's>),
    /// A group over two or more tables.
    Standard(StandardStatementGroup<'g, 's>),
}

impl<'g, 's> PreparedStatementGroup<'g, 's> {
    /// Creates the statement group for one mutation group.
    #[must_use]
    pub fn for_group(group: &'g MutationGroup, session: &'s dyn DriverSession) -> Self {
        if group.len() == 1 {
            Self::Single(SingleTableStatementGroup {
                session,
                group,
                entry: None,
            })
        } else {
            Self::Standard(StandardStatementGroup {
                session,
                entries: (0..group.len()).map(|_| None).collect(),
                group,
            })
        }
    }

    /// Returns the prepared statement for a table, preparing it on first
    /// access.
    ///
    /// Returns `Ok(None)` when the table is not part of this group or is in
    /// the skip set for the current row; callers must treat that as "nothing
    /// to do for this table", not as failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to prepare the statement.
    pub fn details_mut(
        &mut self,
        table_name: &str,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        match self {
            Self::Single(group) => group.details_mut(table_name, skips),
            Self::Standard(group) => group.details_mut(table_name, skips),
        }
    }

    /// Returns the prepared statement of a single-table group without a
    /// table-name lookup, preparing it on first access.
    ///
    /// For a standard group this degenerates to the first table; single-table
    /// callers are paired with single-table groups by executor selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to prepare the statement.
    pub fn single_details_mut(
        &mut self,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        match self {
            Self::Single(group) => group.entry_mut(skips),
            Self::Standard(group) => group.details_at_position(0, skips),
        }
    }

    /// Whether a statement has already been prepared for the table.
    #[must_use]
    pub fn has_prepared(&self, table_name: &str) -> bool {
        match self {
            Self::Single(group) => group
                .entry
                .as_ref()
                .is_some_and(|entry| entry.table_name() == table_name),
            Self::Standard(group) => group
                .entries
                .iter()
                .flatten()
                .any(|entry| entry.table_name() == table_name),
        }
    }

    /// Visits every prepared statement in execution order: ascending table
    /// index for inserts and updates, descending for deletes so dependent
    /// rows are removed before the rows they reference.
    ///
    /// Tables never prepared (skipped or untouched) are not visited.
    ///
    /// # Errors
    ///
    /// Propagates the first error the action returns.
    pub fn for_each_statement<F>(&mut self, mut action: F) -> Result<(), EngineError>
    where
        F: FnMut(&mut PreparedStatementDetails<'g, 's>) -> Result<(), EngineError>,
    {
        match self {
            Self::Single(group) => {
                if let Some(entry) = group.entry.as_mut() {
                    action(entry)?;
                }
            }
            Self::Standard(group) => {
                if group.group.mutation_type().executes_in_reverse_order() {
                    for entry in group.entries.iter_mut().rev().flatten() {
                        action(entry)?;
                    }
                } else {
                    for entry in group.entries.iter_mut().flatten() {
                        action(entry)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Closes every prepared statement and clears internal state.
    ///
    /// Safe to call at any time, including after a mid-sequence failure;
    /// driver statements release their resources on drop. A later
    /// `details_mut` call prepares a fresh statement.
    pub fn release(&mut self) {
        debug!("Releasing prepared statement group");
        match self {
            Self::Single(group) => group.entry = None,
            Self::Standard(group) => {
                for entry in &mut group.entries {
                    *entry = None;
                }
            }
        }
    }
}

impl std::fmt::Debug for PreparedStatementGroup<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(group) => f
                .debug_struct("SingleTableStatementGroup")
                .field("prepared", &group.entry.is_some())
                .finish(),
            Self::Standard(group) => f
                .debug_struct("StandardStatementGroup")
                .field(
                    "prepared",
                    &group.entries.iter().filter(|entry| entry.is_some()).count(),
                )
                .finish(),
        }
    }
}

/// Statement group over exactly one table.
pub struct SingleTableStatementGroup<'g, 's> {
    session: &'s dyn DriverSession,
    group: &'g MutationGroup,
    entry: Option<PreparedStatementDetails<'g, 's>>,
}

impl<'g, 's> SingleTableStatementGroup<'g, 's> {
    fn details_mut(
        &mut self,
        table_name: &str,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        let group = self.group;
        let Some(mutation) = group.by_table_name(table_name) else {
            return Ok(None);
        };
        self.prepare_entry(mutation, skips)
    }

    fn entry_mut(
        &mut self,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        let group = self.group;
        let Some(mutation) = group.single() else {
            return Ok(None);
        };
        self.prepare_entry(mutation, skips)
    }

    fn prepare_entry(
        &mut self,
        mutation: &'g TableMutation,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        if skips.contains(mutation.table_index()) {
            return Ok(None);
        }
        if self.entry.is_none() {
            self.entry = Some(prepare_statement(self.session, self.group, mutation)?);
        }
        Ok(self.entry.as_mut())
    }
}

/// Statement group over two or more tables, slotted by group position.
pub struct StandardStatementGroup<'g, 's> {
    session: &'s dyn DriverSession,
    group: &'g MutationGroup,
    entries: Vec<Option<PreparedStatementDetails<'g, 's>>>,
}

impl<'g, 's> StandardStatementGroup<'g, 's> {
    fn details_mut(
        &mut self,
        table_name: &str,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        let group = self.group;
        let Some(position) = group
            .iter()
            .position(|mutation| mutation.table_name() == table_name)
        else {
            return Ok(None);
        };
        self.details_at_position(position, skips)
    }

    fn details_at_position(
        &mut self,
        position: usize,
        skips: &TableSkips,
    ) -> Result<Option<&mut PreparedStatementDetails<'g, 's>>, EngineError> {
        let group = self.group;
        let Some(mutation) = group.at_position(position) else {
            return Ok(None);
        };
        if skips.contains(mutation.table_index()) {
            return Ok(None);
        }
        let Some(slot) = self.entries.get_mut(position) else {
            return Ok(None);
        };
        if slot.is_none() {
            *slot = Some(prepare_statement(self.session, group, mutation)?);
        }
        Ok(slot.as_mut())
    }
}

/// Prepares one table statement, routing identity inserts through the
/// generated-key path and callables through callable preparation.
fn prepare_statement<'g, 's>(
    session: &'s dyn DriverSession,
    group: &'g MutationGroup,
    mutation: &'g TableMutation,
) -> Result<PreparedStatementDetails<'g, 's>, EngineError> {
    let kind = statement_kind(group, mutation);
    debug!(
        table = mutation.table_name(),
        kind = ?kind,
        "Preparing mutation statement"
    );
    let statement = session
        .prepare(mutation.sql(), kind)
        .map_err(|source| EngineError::prepare(mutation.sql(), source))?;
    Ok(PreparedStatementDetails {
        mutation,
        statement,
    })
}

fn statement_kind(group: &MutationGroup, mutation: &TableMutation) -> StatementKind {
    if group.mutation_type() == MutationType::Insert
        && group.target().uses_generated_id()
        && mutation.table_name() == group.target().identifier_table_name()
    {
        StatementKind::ReturningGeneratedKeys
    } else if mutation.details().is_callable() {
        StatementKind::Callable
    } else {
        StatementKind::Standard
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-table statement descriptions.
//!
//! A [`TableMutation`] is the immutable description of one table's SQL
//! statement within one logical write: the SQL text, the row-count contract,
//! and the column-to-bind-position maps the engine needs to parameterize it.
//!
//! The three variants form a closed sum over the mutation types, each
//! carrying only the payload that applies to it: inserts and updates carry
//! value-column maps, updates and deletes carry restriction (WHERE) maps.

use crate::column_params::ColumnParamIndexes;
use crate::expectation::Expectation;
use crate::mutation_type::MutationType;

/// The shared core of every table mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDetails {
    table_name: String,
    sql: String,
    is_callable: bool,
    expectation: Expectation,
    is_optional: bool,
    table_index: usize,
    table_indexes: Vec<usize>,
    parameter_count: usize,
}

impl TableDetails {
    /// Creates the shared details for one table statement.
    ///
    /// `table_index` is this table's logical position within the entity
    /// mapping (0 = primary/root table). `table_indexes` lists every logical
    /// index the table occupies; it always contains `table_index`.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        sql: impl Into<String>,
        expectation: Expectation,
        table_index: usize,
        parameter_count: usize,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            sql: sql.into(),
            is_callable: false,
            expectation,
            is_optional: false,
            table_index,
            table_indexes: vec![table_index],
            parameter_count,
        }
    }

    /// Marks the statement as a callable (stored procedure) invocation.
    #[must_use]
    pub const fn callable(mut self) -> Self {
        self.is_callable = true;
        self
    }

    /// Marks the table as optional for this mutation.
    ///
    /// An optional table's row may be physically absent for a given write; the
    /// mapping layer's skip checker decides per row whether it is visited.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Adds a further logical table index this table occupies.
    #[must_use]
    pub fn with_additional_index(mut self, index: usize) -> Self {
        if !self.table_indexes.contains(&index) {
            self.table_indexes.push(index);
        }
        self
    }

    /// The physical table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The SQL text of the statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Whether the statement is a callable invocation.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        self.is_callable
    }

    /// The affected-row-count contract.
    #[must_use]
    pub const fn expectation(&self) -> Expectation {
        self.expectation
    }

    /// Whether the table may be skipped entirely for a given write.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.is_optional
    }

    /// The table's primary logical index (0 = root table).
    #[must_use]
    pub const fn table_index(&self) -> usize {
        self.table_index
    }

    /// Every logical index the table occupies.
    #[must_use]
    pub fn table_indexes(&self) -> &[usize] {
        &self.table_indexes
    }

    /// The number of bind parameters in the statement.
    #[must_use]
    pub const fn parameter_count(&self) -> usize {
        self.parameter_count
    }
}

/// An INSERT against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInsert {
    details: TableDetails,
    value_params: ColumnParamIndexes,
    key_value_params: ColumnParamIndexes,
}

impl TableInsert {
    /// Creates an insert description.
    ///
    /// `value_params` maps non-key columns written in the VALUES list;
    /// `key_value_params` maps the key columns written in the VALUES list,
    /// which is how a generated root-table key is propagated into dependent
    /// tables of the same logical write.
    #[must_use]
    pub const fn new(
        details: TableDetails,
        value_params: ColumnParamIndexes,
        key_value_params: ColumnParamIndexes,
    ) -> Self {
        Self {
            details,
            value_params,
            key_value_params,
        }
    }

    /// The shared statement details.
    #[must_use]
    pub const fn details(&self) -> &TableDetails {
        &self.details
    }

    /// Bind positions of the non-key VALUES columns.
    #[must_use]
    pub const fn value_params(&self) -> &ColumnParamIndexes {
        &self.value_params
    }

    /// Bind positions of the key VALUES columns.
    #[must_use]
    pub const fn key_value_params(&self) -> &ColumnParamIndexes {
        &self.key_value_params
    }
}

/// An UPDATE against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableUpdate {
    details: TableDetails,
    value_params: ColumnParamIndexes,
    key_value_params: ColumnParamIndexes,
    restriction_params: ColumnParamIndexes,
}

impl TableUpdate {
    /// Creates an update description.
    ///
    /// `restriction_params` maps the WHERE-clause columns (key and, for
    /// versioned entities, the version column).
    #[must_use]
    pub const fn new(
        details: TableDetails,
        value_params: ColumnParamIndexes,
        key_value_params: ColumnParamIndexes,
        restriction_params: ColumnParamIndexes,
    ) -> Self {
        Self {
            details,
            value_params,
            key_value_params,
            restriction_params,
        }
    }

    /// The shared statement details.
    #[must_use]
    pub const fn details(&self) -> &TableDetails {
        &self.details
    }

    /// Bind positions of the SET columns.
    #[must_use]
    pub const fn value_params(&self) -> &ColumnParamIndexes {
        &self.value_params
    }

    /// Bind positions of key columns written in the SET list, if any.
    #[must_use]
    pub const fn key_value_params(&self) -> &ColumnParamIndexes {
        &self.key_value_params
    }

    /// Bind positions of the WHERE-clause columns.
    #[must_use]
    pub const fn restriction_params(&self) -> &ColumnParamIndexes {
        &self.restriction_params
    }
}

/// A DELETE against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDelete {
    details: TableDetails,
    restriction_params: ColumnParamIndexes,
}

impl TableDelete {
    /// Creates a delete description.
    #[must_use]
    pub const fn new(details: TableDetails, restriction_params: ColumnParamIndexes) -> Self {
        Self {
            details,
            restriction_params,
        }
    }

    /// The shared statement details.
    #[must_use]
    pub const fn details(&self) -> &TableDetails {
        &self.details
    }

    /// Bind positions of the WHERE-clause columns.
    #[must_use]
    pub const fn restriction_params(&self) -> &ColumnParamIndexes {
        &self.restriction_params
    }
}

/// One table's statement description within a logical write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableMutation {
    /// An INSERT statement.
    Insert(TableInsert),
    /// An UPDATE statement.
    Update(TableUpdate),
    /// A DELETE statement.
    Delete(TableDelete),
}

impl TableMutation {
    /// The shared statement details.
    #[must_use]
    pub const fn details(&self) -> &TableDetails {
        match self {
            Self::Insert(insert) => insert.details(),
            Self::Update(update) => update.details(),
            Self::Delete(delete) => delete.details(),
        }
    }

    /// The mutation type of this statement.
    #[must_use]
    pub const fn mutation_type(&self) -> MutationType {
        match self {
            Self::Insert(_) => MutationType::Insert,
            Self::Update(_) => MutationType::Update,
            Self::Delete(_) => MutationType::Delete,
        }
    }

    /// The physical table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.details().table_name()
    }

    /// The SQL text of the statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.details().sql()
    }

    /// The affected-row-count contract.
    #[must_use]
    pub const fn expectation(&self) -> Expectation {
        self.details().expectation()
    }

    /// Whether the table may be skipped for a given write.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.details().is_optional()
    }

    /// The table's primary logical index (0 = root table).
    #[must_use]
    pub const fn table_index(&self) -> usize {
        self.details().table_index()
    }

    /// Every logical index the table occupies.
    #[must_use]
    pub fn table_indexes(&self) -> &[usize] {
        self.details().table_indexes()
    }

    /// The number of bind parameters in the statement.
    #[must_use]
    pub const fn parameter_count(&self) -> usize {
        self.details().parameter_count()
    }

    /// The value-column bind map, for inserts and updates.
    #[must_use]
    pub const fn value_params(&self) -> Option<&ColumnParamIndexes> {
        match self {
            Self::Insert(insert) => Some(insert.value_params()),
            Self::Update(update) => Some(update.value_params()),
            Self::Delete(_) => None,
        }
    }

    /// The key-column bind map within the VALUES/SET list, if any.
    #[must_use]
    pub const fn key_value_params(&self) -> Option<&ColumnParamIndexes> {
        match self {
            Self::Insert(insert) => Some(insert.key_value_params()),
            Self::Update(update) => Some(update.key_value_params()),
            Self::Delete(_) => None,
        }
    }

    /// The restriction (WHERE) bind map, for updates and deletes.
    #[must_use]
    pub const fn restriction_params(&self) -> Option<&ColumnParamIndexes> {
        match self {
            Self::Insert(_) => None,
            Self::Update(update) => Some(update.restriction_params()),
            Self::Delete(delete) => Some(delete.restriction_params()),
        }
    }
}

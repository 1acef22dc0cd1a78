// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The ordered collection of table mutations for one logical write.

use crate::mutation_type::MutationType;
use crate::table_mutation::TableMutation;
use crate::target::MutationTarget;

/// An ordered group of [`TableMutation`]s for one logical write against one
/// mutation target.
///
/// Entries are addressable both by table name and by logical table index.
/// Lookups return `None` when no mutation is registered for the given
/// identity; that is the designed signal for "this table is not part of this
/// mutation" and must be distinguished from "this table was skipped for this
/// row", which the engine tracks separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationGroup {
    mutation_type: MutationType,
    target: MutationTarget,
    mutations: Vec<TableMutation>,
}

impl MutationGroup {
    /// Starts building a group.
    #[must_use]
    pub const fn builder(mutation_type: MutationType, target: MutationTarget) -> MutationGroupBuilder {
        MutationGroupBuilder {
            mutation_type,
            target,
            mutations: Vec::new(),
        }
    }

    /// The kind of logical write this group describes.
    #[must_use]
    pub const fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// The entity-mapping summary this group was built for.
    #[must_use]
    pub const fn target(&self) -> &MutationTarget {
        &self.target
    }

    /// The number of table mutations in the group.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Whether the group contains no table mutations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Looks up a table mutation by physical table name.
    #[must_use]
    pub fn by_table_name(&self, table_name: &str) -> Option<&TableMutation> {
        self.mutations
            .iter()
            .find(|mutation| mutation.table_name() == table_name)
    }

    /// Looks up a table mutation by logical table index.
    ///
    /// A table occupying more than one logical index is found under each of
    /// its indexes.
    #[must_use]
    pub fn by_table_index(&self, index: usize) -> Option<&TableMutation> {
        self.mutations
            .iter()
            .find(|mutation| mutation.table_indexes().contains(&index))
    }

    /// The table mutation at the given position in declaration order.
    #[must_use]
    pub fn at_position(&self, position: usize) -> Option<&TableMutation> {
        self.mutations.get(position)
    }

    /// The single table mutation of a single-table group.
    ///
    /// Returns `None` when the group holds more or fewer than one entry.
    #[must_use]
    pub fn single(&self) -> Option<&TableMutation> {
        match self.mutations.as_slice() {
            [mutation] => Some(mutation),
            _ => None,
        }
    }

    /// Iterates table mutations in ascending table-index order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, TableMutation> {
        self.mutations.iter()
    }
}

impl<'a> IntoIterator for &'a MutationGroup {
    type Item = &'a TableMutation;
    type IntoIter = std::slice::Iter<'a, TableMutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}

/// Builder for [`MutationGroup`].
///
/// The mapping layer adds table mutations in ascending table-index order;
/// for multi-table groups, the entry with table index 0 (the root table)
/// comes first. Violations are programming errors in the mapping layer and
/// are caught by debug assertions, not runtime errors.
#[derive(Debug)]
pub struct MutationGroupBuilder {
    mutation_type: MutationType,
    target: MutationTarget,
    mutations: Vec<TableMutation>,
}

impl MutationGroupBuilder {
    /// Adds the next table mutation.
    #[must_use]
    pub fn add(mut self, mutation: TableMutation) -> Self {
        debug_assert!(
            self.mutations
                .last()
                .is_none_or(|previous| previous.table_index() < mutation.table_index()),
            "table mutations must be added in ascending table-index order"
        );
        self.mutations.push(mutation);
        self
    }

    /// Finishes the group.
    #[must_use]
    pub fn build(self) -> MutationGroup {
        debug_assert!(
            self.mutations.len() < 2
                || self
                    .mutations
                    .first()
                    .is_some_and(|first| first.table_index() == 0),
            "a multi-table group must start with the root table (index 0)"
        );
        MutationGroup {
            mutation_type: self.mutation_type,
            target: self.target,
            mutations: self.mutations,
        }
    }
}

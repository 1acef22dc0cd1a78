// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution of which tables can be omitted for one row.
//!
//! A secondary table whose row would contain no meaningful data must not be
//! written. The mapping layer supplies a per-row skip checker (typically "are
//! all bound values for this table null/unchanged?"); this module decides,
//! once per logical write and before any statement is prepared, which
//! non-primary tables the engine never visits.

use rowmut_model::{MutationGroup, TableMutation};

/// The set of table indexes skipped for one logical write.
///
/// Tables are identified by their primary table index. Two rows have the same
/// "bind shape" against a batched statement group exactly when their skip
/// sets are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSkips {
    indexes: Vec<usize>,
}

impl TableSkips {
    /// The empty skip set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            indexes: Vec::new(),
        }
    }

    fn insert(&mut self, index: usize) {
        if let Err(slot) = self.indexes.binary_search(&index) {
            self.indexes.insert(slot, index);
        }
    }

    /// Whether the table with the given primary index is skipped.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indexes.binary_search(&index).is_ok()
    }

    /// Whether no table is skipped.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// The number of skipped tables.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Iterates skipped table indexes in ascending order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indexes.iter().copied()
    }
}

/// Determines which tables of `group` can be omitted for one row.
///
/// Rules:
/// - The empty set is returned immediately when the mutation type cannot skip
///   tables (deletes never skip) or the target declares no skippable tables.
/// - The table at index 0 (the primary/root table) is never included, even if
///   the checker claims it could be skipped.
/// - Every other table mutation is included iff `skip_checker` returns true
///   for it. Optionality is the checker's concern: the mapping layer already
///   knows which of its tables are optional.
///
/// This function is pure and must be called before any statement is prepared,
/// so the result can gate which tables are visited at all.
#[must_use]
pub fn determine_tables_to_skip<F>(group: &MutationGroup, mut skip_checker: F) -> TableSkips
where
    F: FnMut(&TableMutation) -> bool,
{
    if !group.mutation_type().can_skip_tables() || !group.target().has_skippable_tables() {
        return TableSkips::none();
    }

    // Fast path: a sub-group holding exactly one non-primary table needs no
    // iteration.
    if let Some(mutation) = group.single() {
        let mut skips = TableSkips::none();
        if mutation.table_index() != 0 && skip_checker(mutation) {
            skips.insert(mutation.table_index());
        }
        return skips;
    }

    let mut skips = TableSkips::none();
    for mutation in group {
        if mutation.table_index() == 0 {
            continue;
        }
        if skip_checker(mutation) {
            skips.insert(mutation.table_index());
        }
    }
    skips
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// An opaque summary of the entity mapping a mutation group targets.
///
/// The engine never inspects mapping metadata directly; this summary carries
/// the few facts executor selection and the generated-key path depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTarget {
    entity_name: String,
    identifier_table_name: String,
    table_count: usize,
    uses_generated_id: bool,
    has_skippable_tables: bool,
}

impl MutationTarget {
    /// Creates a target summary.
    ///
    /// `uses_generated_id` is true when the mapping defines an identity-insert
    /// delegate: the identifier table's key is database-generated and must be
    /// captured synchronously on insert.
    #[must_use]
    pub fn new(
        entity_name: impl Into<String>,
        identifier_table_name: impl Into<String>,
        table_count: usize,
        uses_generated_id: bool,
        has_skippable_tables: bool,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            identifier_table_name: identifier_table_name.into(),
            table_count,
            uses_generated_id,
            has_skippable_tables,
        }
    }

    /// The entity name, used for diagnostics only.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// The table holding the entity identifier (the root table).
    #[must_use]
    pub fn identifier_table_name(&self) -> &str {
        &self.identifier_table_name
    }

    /// The number of physical tables the entity maps to.
    #[must_use]
    pub const fn table_count(&self) -> usize {
        self.table_count
    }

    /// Whether the identifier is database-generated on insert.
    #[must_use]
    pub const fn uses_generated_id(&self) -> bool {
        self.uses_generated_id
    }

    /// Whether any of the entity's tables is skippable.
    #[must_use]
    pub const fn has_skippable_tables(&self) -> bool {
        self.has_skippable_tables
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// The kind of logical write a mutation group describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationType {
    /// Insert one entity's state across its tables.
    Insert,
    /// Update one entity's state across its tables.
    Update,
    /// Delete one entity's state across its tables.
    Delete,
}

impl MutationType {
    /// Whether non-primary tables may be skipped for a single write.
    ///
    /// Deletes never skip: a secondary-table row that was never written is
    /// still a valid (zero-row) delete target, and skipping based on current
    /// in-memory values would leave stale rows behind.
    #[must_use]
    pub const fn can_skip_tables(self) -> bool {
        matches!(self, Self::Insert | Self::Update)
    }

    /// Whether table statements execute in descending table-index order.
    ///
    /// Deletes run dependents before parents so foreign keys referencing the
    /// root table are removed first.
    #[must_use]
    pub const fn executes_in_reverse_order(self) -> bool {
        matches!(self, Self::Delete)
    }
}

impl std::fmt::Display for MutationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

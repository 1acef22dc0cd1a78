// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// An ordered map from column name to 0-based bind position.
///
/// Positions are relative to one table statement's full parameter list. The
/// mapping layer registers columns in SQL text order, so iteration order is
/// the order the columns appear in the statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnParamIndexes {
    entries: Vec<(String, usize)>,
}

impl ColumnParamIndexes {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a column at the given bind position.
    ///
    /// Registering the same column twice replaces the earlier position; a
    /// column occupies exactly one position within one statement.
    pub fn register(&mut self, column: impl Into<String>, position: usize) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == column) {
            entry.1 = position;
        } else {
            self.entries.push((column, position));
        }
    }

    /// Looks up the bind position for a column.
    #[must_use]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, position)| *position)
    }

    /// Iterates `(column, position)` pairs in registration order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(name, position)| (name.as_str(), *position))
    }

    /// The number of registered columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no columns are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, usize)> for ColumnParamIndexes {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        let mut indexes = Self::new();
        for (column, position) in iter {
            indexes.register(column, position);
        }
        indexes
    }
}

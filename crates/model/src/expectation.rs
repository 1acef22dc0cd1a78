// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// The affected-row-count contract attached to one table statement.
///
/// An expectation is how optimistic-concurrency conflicts and missing rows
/// are detected: the engine compares the driver-reported update count against
/// the contract after every execution. A mismatch is a semantic failure,
/// distinct from a driver-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expectation {
    /// No verification; any update count is accepted.
    None,
    /// The update count must equal the given value exactly.
    ///
    /// `RowCount(1)` is the usual contract for versioned UPDATE and DELETE
    /// statements restricted by primary key (and version column).
    RowCount(u64),
}

impl Expectation {
    /// Checks an actual affected-row count against this contract.
    #[must_use]
    pub const fn matches(self, actual: u64) -> bool {
        match self {
            Self::None => true,
            Self::RowCount(expected) => expected == actual,
        }
    }

    /// The expected count, if this contract carries one.
    #[must_use]
    pub const fn expected_count(self) -> Option<u64> {
        match self {
            Self::None => None,
            Self::RowCount(expected) => Some(expected),
        }
    }
}

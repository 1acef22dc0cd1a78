// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

use crate::driver::{DriverError, SqlValue};

/// Errors that can occur while executing a mutation.
///
/// Driver failures carry the offending SQL text; bind failures additionally
/// carry the parameter position and value. [`EngineError::ExpectationMismatch`]
/// is a semantic failure distinct from driver errors: it is how
/// optimistic-lock conflicts and missing rows are reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Statement preparation failed at the driver level.
    #[error("failed to prepare statement `{sql}`: {source}")]
    Prepare {
        /// The SQL text that failed to prepare.
        sql: String,
        /// The underlying driver error.
        #[source]
        source: DriverError,
    },
    /// A parameter bind failed at the driver level.
    #[error("failed to bind parameter {position} ({value}) for `{sql}`: {source}")]
    Bind {
        /// The SQL text of the statement.
        sql: String,
        /// The 0-based parameter position.
        position: usize,
        /// A rendering of the rejected value.
        value: String,
        /// The underlying driver error.
        #[source]
        source: DriverError,
    },
    /// Statement execution failed at the driver level.
    #[error("failed to execute statement `{sql}`: {source}")]
    Execute {
        /// The SQL text that failed to execute.
        sql: String,
        /// The underlying driver error.
        #[source]
        source: DriverError,
    },
    /// Batch execution failed at the driver level.
    #[error("batch execution failed for `{sql}`: {source}")]
    Batch {
        /// The SQL text of the batched statement.
        sql: String,
        /// The underlying driver error.
        #[source]
        source: DriverError,
    },
    /// The driver reported an affected-row count that violates the
    /// statement's expectation.
    #[error(
        "unexpected row count for table `{table_name}`: expected {expected}, got {actual} (`{sql}`)"
    )]
    ExpectationMismatch {
        /// The table whose statement violated its contract.
        table_name: String,
        /// The SQL text of the statement.
        sql: String,
        /// The contracted row count.
        expected: u64,
        /// The driver-reported row count.
        actual: u64,
    },
    /// No mutation is registered for a table the caller addressed as
    /// mandatory (e.g. the identifier table of a post-insert execution).
    #[error("no mutation is registered for table `{0}`")]
    UnknownTable(String),
}

impl EngineError {
    pub(crate) fn prepare(sql: &str, source: DriverError) -> Self {
        Self::Prepare {
            sql: sql.to_string(),
            source,
        }
    }

    pub(crate) fn bind(sql: &str, position: usize, value: &SqlValue, source: DriverError) -> Self {
        Self::Bind {
            sql: sql.to_string(),
            position,
            value: format!("{value:?}"),
            source,
        }
    }

    pub(crate) fn execute(sql: &str, source: DriverError) -> Self {
        Self::Execute {
            sql: sql.to_string(),
            source,
        }
    }

    pub(crate) fn batch(sql: &str, source: DriverError) -> Self {
        Self::Batch {
            sql: sql.to_string(),
            source,
        }
    }

    /// Whether this error signals an optimistic-concurrency conflict (or a
    /// missing row) rather than a driver failure.
    #[must_use]
    pub const fn is_concurrency_conflict(&self) -> bool {
        matches!(self, Self::ExpectationMismatch { .. })
    }
}

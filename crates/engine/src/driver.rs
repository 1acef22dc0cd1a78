// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The narrow abstraction over the SQL driver.
//!
//! The engine assumes a driver capable of preparing a statement, binding
//! positional parameters, executing, and reporting the affected-row count.
//! Everything else (dialect syntax, transactions, connection pooling) is
//! opaque to this layer and belongs to the backend crate implementing these
//! traits.

use thiserror::Error;

/// A positional bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// A 64-bit integer.
    Integer(i64),
    /// A 64-bit float.
    Real(f64),
    /// A UTF-8 string.
    Text(String),
    /// A byte blob.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Whether this value is SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// How a statement must be prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// An ordinary prepared statement.
    Standard,
    /// A callable (stored procedure) invocation.
    Callable,
    /// An INSERT whose database-generated key must be readable after
    /// execution via [`DriverStatement::execute_returning_generated_key`].
    ReturningGeneratedKeys,
}

/// An error reported by the driver backend.
///
/// Backends convert their native error type into this via `From` impls; the
/// engine wraps it with SQL and parameter context at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    code: Option<i32>,
}

impl DriverError {
    /// Creates a driver error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a driver error carrying a backend-specific error code.
    #[must_use]
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }

    /// The backend error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The backend-specific error code, if any.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }
}

/// The result of executing an insert through the generated-key path.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedKey {
    /// The affected-row count of the insert.
    pub row_count: u64,
    /// The database-generated key value.
    pub key: SqlValue,
}

/// One live prepared statement.
///
/// Positions are 0-based; backends translate to their native convention.
/// Implementations must release driver resources on drop, so that dropping a
/// statement group is always a complete cleanup even after a mid-sequence
/// failure.
pub trait DriverStatement {
    /// Binds a value at the given 0-based position.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the bind.
    fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), DriverError>;

    /// Executes the statement with the currently bound parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails at the driver level.
    fn execute(&mut self) -> Result<u64, DriverError>;

    /// Executes an insert prepared with
    /// [`StatementKind::ReturningGeneratedKeys`] and reads back the generated
    /// key.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails or the backend cannot produce a
    /// generated key for this statement.
    fn execute_returning_generated_key(&mut self) -> Result<GeneratedKey, DriverError>;

    /// Queues the currently bound parameters as one batch row.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the queued row.
    fn add_batch(&mut self) -> Result<(), DriverError>;

    /// Executes every queued batch row and returns the affected-row count per
    /// row, in queue order. Leaves the queue empty.
    ///
    /// # Errors
    ///
    /// Returns an error if any queued row fails at the driver level.
    fn execute_batch(&mut self) -> Result<Vec<u64>, DriverError>;
}

/// A driver connection scoped to one session.
///
/// `prepare` takes `&self` so several live statements can coexist against one
/// connection, which multi-table groups require.
pub trait DriverSession {
    /// Prepares a statement of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to prepare the statement.
    fn prepare(
        &self,
        sql: &str,
        kind: StatementKind,
    ) -> Result<Box<dyn DriverStatement + '_>, DriverError>;
}

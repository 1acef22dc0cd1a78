// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prepared statement wrapper for the `SQLite` backend.
//!
//! Engine bind positions are 0-based and buffered; they reach `SQLite`
//! (1-based) only when the statement executes. Buffering is what makes batch
//! emulation possible: `add_batch` snapshots the current row and
//! `execute_batch` replays every snapshot through the same prepared
//! statement.

use rowmut_engine::{DriverError, DriverStatement, GeneratedKey, SqlValue, StatementKind};
use rusqlite::{Connection, Statement};

use crate::driver_error;

/// One live `SQLite` prepared statement.
pub struct SqliteStatement<'conn> {
    conn: &'conn Connection,
    statement: Statement<'conn>,
    kind: StatementKind,
    pending: Vec<Option<SqlValue>>,
    queued: Vec<Vec<Option<SqlValue>>>,
}

impl<'conn> SqliteStatement<'conn> {
    pub(crate) fn new(
        conn: &'conn Connection,
        statement: Statement<'conn>,
        kind: StatementKind,
    ) -> Self {
        let parameter_count = statement.parameter_count();
        Self {
            conn,
            statement,
            kind,
            pending: vec![None; parameter_count],
            queued: Vec::new(),
        }
    }

    fn fresh_row(&self) -> Vec<Option<SqlValue>> {
        vec![None; self.statement.parameter_count()]
    }
}

/// Binds one buffered row onto the statement, translating to 1-based slots.
fn apply_row(
    statement: &mut Statement<'_>,
    row: &[Option<SqlValue>],
) -> Result<(), DriverError> {
    for (position, slot) in row.iter().enumerate() {
        let Some(value) = slot else {
            return Err(DriverError::new(format!(
                "parameter at position {position} was never bound"
            )));
        };
        let result = match value {
            SqlValue::Null => statement.raw_bind_parameter(position + 1, rusqlite::types::Null),
            SqlValue::Integer(value) => statement.raw_bind_parameter(position + 1, value),
            SqlValue::Real(value) => statement.raw_bind_parameter(position + 1, value),
            SqlValue::Text(value) => statement.raw_bind_parameter(position + 1, value.as_str()),
            SqlValue::Blob(value) => statement.raw_bind_parameter(position + 1, value.as_slice()),
        };
        result.map_err(|error| driver_error(&error))?;
    }
    Ok(())
}

impl DriverStatement for SqliteStatement<'_> {
    fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), DriverError> {
        let Some(slot) = self.pending.get_mut(position) else {
            return Err(DriverError::new(format!(
                "bind position {position} out of range for statement with {} parameters",
                self.statement.parameter_count()
            )));
        };
        *slot = Some(value.clone());
        Ok(())
    }

    fn execute(&mut self) -> Result<u64, DriverError> {
        apply_row(&mut self.statement, &self.pending)?;
        let changed = self
            .statement
            .raw_execute()
            .map_err(|error| driver_error(&error))?;
        Ok(changed as u64)
    }

    fn execute_returning_generated_key(&mut self) -> Result<GeneratedKey, DriverError> {
        if self.kind != StatementKind::ReturningGeneratedKeys {
            return Err(DriverError::new(
                "statement was not prepared for generated keys",
            ));
        }
        apply_row(&mut self.statement, &self.pending)?;
        let changed = self
            .statement
            .raw_execute()
            .map_err(|error| driver_error(&error))?;
        // The rowid must be read before anything else runs on this
        // connection.
        let key = self.conn.last_insert_rowid();
        Ok(GeneratedKey {
            row_count: changed as u64,
            key: SqlValue::Integer(key),
        })
    }

    fn add_batch(&mut self) -> Result<(), DriverError> {
        let fresh = self.fresh_row();
        let row = std::mem::replace(&mut self.pending, fresh);
        self.queued.push(row);
        Ok(())
    }

    fn execute_batch(&mut self) -> Result<Vec<u64>, DriverError> {
        let rows = std::mem::take(&mut self.queued);
        let mut row_counts = Vec::with_capacity(rows.len());
        for row in &rows {
            apply_row(&mut self.statement, row)?;
            let changed = self
                .statement
                .raw_execute()
                .map_err(|error| driver_error(&error))?;
            row_counts.push(changed as u64);
        }
        Ok(row_counts)
    }
}

impl std::fmt::Debug for SqliteStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStatement")
            .field("kind", &self.kind)
            .field("queued_rows", &self.queued.len())
            .finish_non_exhaustive()
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use std::cell::RefCell;
use std::rc::Rc;

use rowmut_model::{
    ColumnParamIndexes, Expectation, MutationGroup, MutationTarget, MutationType, TableDelete,
    TableDetails, TableInsert, TableMutation, TableUpdate,
};

use crate::driver::{
    DriverError, DriverSession, DriverStatement, GeneratedKey, SqlValue, StatementKind,
};
use crate::{EngineConfig, SessionSettings};

/// Everything the engine asked the driver to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Prepare {
        sql: String,
        kind: StatementKind,
    },
    Bind {
        sql: String,
        position: usize,
        value: SqlValue,
    },
    Execute {
        sql: String,
    },
    AddBatch {
        sql: String,
    },
    ExecuteBatch {
        sql: String,
        rows: usize,
    },
}

#[derive(Debug)]
struct MockBehavior {
    row_count: u64,
    generated_key: SqlValue,
    fail_prepare_sql: Option<String>,
    fail_execute_sql: Option<String>,
}

/// A scripted driver session recording every interaction.
#[derive(Debug)]
pub struct MockSession {
    events: Rc<RefCell<Vec<DriverEvent>>>,
    behavior: Rc<RefCell<MockBehavior>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            behavior: Rc::new(RefCell::new(MockBehavior {
                row_count: 1,
                generated_key: SqlValue::Integer(1),
                fail_prepare_sql: None,
                fail_execute_sql: None,
            })),
        }
    }

    pub fn events(&self) -> Vec<DriverEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn prepared_sql(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DriverEvent::Prepare { sql, .. } => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DriverEvent::Execute { sql } => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_row_count(&self, row_count: u64) {
        self.behavior.borrow_mut().row_count = row_count;
    }

    pub fn set_generated_key(&self, key: SqlValue) {
        self.behavior.borrow_mut().generated_key = key;
    }

    pub fn fail_prepare_on(&self, sql: &str) {
        self.behavior.borrow_mut().fail_prepare_sql = Some(sql.to_string());
    }

    pub fn fail_execute_on(&self, sql: &str) {
        self.behavior.borrow_mut().fail_execute_sql = Some(sql.to_string());
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverSession for MockSession {
    fn prepare(
        &self,
        sql: &str,
        kind: StatementKind,
    ) -> Result<Box<dyn DriverStatement + '_>, DriverError> {
        if self.behavior.borrow().fail_prepare_sql.as_deref() == Some(sql) {
            return Err(DriverError::new("prepare refused"));
        }
        self.events.borrow_mut().push(DriverEvent::Prepare {
            sql: sql.to_string(),
            kind,
        });
        Ok(Box::new(MockStatement {
            sql: sql.to_string(),
            events: Rc::clone(&self.events),
            behavior: Rc::clone(&self.behavior),
            queued: 0,
        }))
    }
}

struct MockStatement {
    sql: String,
    events: Rc<RefCell<Vec<DriverEvent>>>,
    behavior: Rc<RefCell<MockBehavior>>,
    queued: usize,
}

impl DriverStatement for MockStatement {
    fn bind(&mut self, position: usize, value: &SqlValue) -> Result<(), DriverError> {
        self.events.borrow_mut().push(DriverEvent::Bind {
            sql: self.sql.clone(),
            position,
            value: value.clone(),
        });
        Ok(())
    }

    fn execute(&mut self) -> Result<u64, DriverError> {
        let behavior = self.behavior.borrow();
        if behavior.fail_execute_sql.as_deref() == Some(self.sql.as_str()) {
            return Err(DriverError::with_code("execution refused", 1));
        }
        self.events
            .borrow_mut()
            .push(DriverEvent::Execute {
                sql: self.sql.clone(),
            });
        Ok(behavior.row_count)
    }

    fn execute_returning_generated_key(&mut self) -> Result<GeneratedKey, DriverError> {
        let behavior = self.behavior.borrow();
        if behavior.fail_execute_sql.as_deref() == Some(self.sql.as_str()) {
            return Err(DriverError::with_code("execution refused", 1));
        }
        self.events
            .borrow_mut()
            .push(DriverEvent::Execute {
                sql: self.sql.clone(),
            });
        Ok(GeneratedKey {
            row_count: behavior.row_count,
            key: behavior.generated_key.clone(),
        })
    }

    fn add_batch(&mut self) -> Result<(), DriverError> {
        self.queued += 1;
        self.events.borrow_mut().push(DriverEvent::AddBatch {
            sql: self.sql.clone(),
        });
        Ok(())
    }

    fn execute_batch(&mut self) -> Result<Vec<u64>, DriverError> {
        let behavior = self.behavior.borrow();
        if behavior.fail_execute_sql.as_deref() == Some(self.sql.as_str()) {
            return Err(DriverError::with_code("execution refused", 1));
        }
        let rows = self.queued;
        self.queued = 0;
        self.events.borrow_mut().push(DriverEvent::ExecuteBatch {
            sql: self.sql.clone(),
            rows,
        });
        Ok(vec![behavior.row_count; rows])
    }
}

pub fn insert_sql(table_name: &str) -> String {
    format!("insert into {table_name} (id, name) values (?, ?)")
}

pub fn update_sql(table_name: &str) -> String {
    format!("update {table_name} set name = ? where id = ?")
}

pub fn delete_sql(table_name: &str) -> String {
    format!("delete from {table_name} where id = ?")
}

/// A two-table target ("person" root plus "person_detail" secondary).
pub fn create_test_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 2, false, true)
}

/// A two-table target whose root insert generates its identifier.
pub fn create_generated_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 2, true, true)
}

/// A single-table target.
pub fn create_single_table_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 1, false, false)
}

pub fn create_insert_mutation(table_name: &str, table_index: usize) -> TableMutation {
    let mut key_params = ColumnParamIndexes::new();
    key_params.register("id", 0);
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 1);
    let details = TableDetails::new(
        table_name,
        insert_sql(table_name),
        Expectation::RowCount(1),
        table_index,
        2,
    );
    TableMutation::Insert(TableInsert::new(details, value_params, key_params))
}

pub fn create_update_mutation(table_name: &str, table_index: usize) -> TableMutation {
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 0);
    let mut restriction_params = ColumnParamIndexes::new();
    restriction_params.register("id", 1);
    let details = TableDetails::new(
        table_name,
        update_sql(table_name),
        Expectation::RowCount(1),
        table_index,
        2,
    );
    TableMutation::Update(TableUpdate::new(
        details,
        value_params,
        ColumnParamIndexes::new(),
        restriction_params,
    ))
}

pub fn create_delete_mutation(table_name: &str, table_index: usize) -> TableMutation {
    let mut restriction_params = ColumnParamIndexes::new();
    restriction_params.register("id", 0);
    let details = TableDetails::new(
        table_name,
        delete_sql(table_name),
        Expectation::RowCount(1),
        table_index,
        1,
    );
    TableMutation::Delete(TableDelete::new(details, restriction_params))
}

/// A root insert whose identifier is generated by the database.
pub fn create_generated_root_insert() -> TableMutation {
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 0);
    let details = TableDetails::new(
        "person",
        "insert into person (name) values (?)",
        Expectation::RowCount(1),
        0,
        1,
    );
    TableMutation::Insert(TableInsert::new(
        details,
        value_params,
        ColumnParamIndexes::new(),
    ))
}

/// A secondary insert keyed by the root's generated identifier.
pub fn create_dependent_insert() -> TableMutation {
    let mut key_params = ColumnParamIndexes::new();
    key_params.register("person_id", 0);
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("note", 1);
    let details = TableDetails::new(
        "person_detail",
        "insert into person_detail (person_id, note) values (?, ?)",
        Expectation::RowCount(1),
        1,
        2,
    );
    TableMutation::Insert(TableInsert::new(details, value_params, key_params))
}

pub fn create_insert_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Insert, create_test_target())
        .add(create_insert_mutation("person", 0))
        .add(create_insert_mutation("person_detail", 1))
        .build()
}

pub fn create_update_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Update, create_test_target())
        .add(create_update_mutation("person", 0))
        .add(create_update_mutation("person_detail", 1))
        .build()
}

pub fn create_delete_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Delete, create_test_target())
        .add(create_delete_mutation("person", 0))
        .add(create_delete_mutation("person_detail", 1))
        .build()
}

pub fn create_single_update_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Update, create_single_table_target())
        .add(create_update_mutation("person", 0))
        .build()
}

pub fn create_generated_insert_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Insert, create_generated_target())
        .add(create_generated_root_insert())
        .add(create_dependent_insert())
        .build()
}

pub fn config_with_batch_size(statement_batch_size: usize) -> EngineConfig {
    EngineConfig {
        statement_batch_size,
        log_parameter_bindings: false,
    }
}

pub fn default_settings() -> SessionSettings {
    SessionSettings::default()
}

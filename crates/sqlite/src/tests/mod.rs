// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use rowmut_model::{
    ColumnParamIndexes, Expectation, MutationGroup, MutationTarget, MutationType, TableDelete,
    TableDetails, TableInsert, TableMutation, TableUpdate,
};

use crate::SqliteSession;

pub const SCHEMA: &str = "
    CREATE TABLE person (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );

    CREATE TABLE person_detail (
        person_id INTEGER PRIMARY KEY,
        note TEXT,
        FOREIGN KEY(person_id) REFERENCES person(id)
    );
";

/// Opens an isolated in-memory session with the test schema applied.
pub fn create_test_session() -> SqliteSession {
    let session = SqliteSession::new_in_memory().expect("session should open");
    session.run_script(SCHEMA).expect("schema should apply");
    session
}

pub fn count_rows(session: &SqliteSession, table_name: &str) -> i64 {
    session
        .connection()
        .query_row(&format!("select count(*) from {table_name}"), [], |row| {
            row.get(0)
        })
        .expect("count query should succeed")
}

pub fn create_two_table_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 2, false, true)
}

pub fn create_generated_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 2, true, true)
}

pub fn create_single_table_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 1, false, false)
}

fn person_insert_with_id() -> TableMutation {
    let mut key_params = ColumnParamIndexes::new();
    key_params.register("id", 0);
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 1);
    let details = TableDetails::new(
        "person",
        "insert into person (id, name) values (?, ?)",
        Expectation::RowCount(1),
        0,
        2,
    );
    TableMutation::Insert(TableInsert::new(details, value_params, key_params))
}

fn person_insert_generated() -> TableMutation {
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

fn detail_insert() -> TableMutation {
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

/// A two-table insert with caller-supplied identifiers.
pub fn create_insert_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Insert, create_two_table_target())
        .add(person_insert_with_id())
        .add(detail_insert())
        .build()
}

/// A two-table insert whose root identifier is database-generated.
pub fn create_generated_insert_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Insert, create_generated_target())
        .add(person_insert_generated())
        .add(detail_insert())
        .build()
}

/// A single-table update restricted by identifier.
pub fn create_update_group() -> MutationGroup {
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 0);
    let mut restriction_params = ColumnParamIndexes::new();
    restriction_params.register("id", 1);
    let details = TableDetails::new(
        "person",
        "update person set name = ? where id = ?",
        Expectation::RowCount(1),
        0,
        2,
    );
    MutationGroup::builder(MutationType::Update, create_single_table_target())
        .add(TableMutation::Update(TableUpdate::new(
            details,
            value_params,
            ColumnParamIndexes::new(),
            restriction_params,
        )))
        .build()
}

/// A two-table delete; the detail row must go before its parent.
pub fn create_delete_group() -> MutationGroup {
    let mut person_restriction = ColumnParamIndexes::new();
    person_restriction.register("id", 0);
    let person_details = TableDetails::new(
        "person",
        "delete from person where id = ?",
        Expectation::RowCount(1),
        0,
        1,
    );
    let mut detail_restriction = ColumnParamIndexes::new();
    detail_restriction.register("person_id", 0);
    let detail_details = TableDetails::new(
        "person_detail",
        "delete from person_detail where person_id = ?",
        Expectation::RowCount(1),
        1,
        1,
    );
    MutationGroup::builder(MutationType::Delete, create_two_table_target())
        .add(TableMutation::Delete(TableDelete::new(
            person_details,
            person_restriction,
        )))
        .add(TableMutation::Delete(TableDelete::new(
            detail_details,
            detail_restriction,
        )))
        .build()
}

/// A single-table insert with caller-supplied identifiers, for batching.
pub fn create_single_insert_group() -> MutationGroup {
    let mut key_params = ColumnParamIndexes::new();
    key_params.register("id", 0);
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 1);
    let details = TableDetails::new(
        "person",
        "insert into person (id, name) values (?, ?)",
        Expectation::RowCount(1),
        0,
        2,
    );
    MutationGroup::builder(MutationType::Insert, create_single_table_target())
        .add(TableMutation::Insert(TableInsert::new(
            details,
            value_params,
            key_params,
        )))
        .build()
}

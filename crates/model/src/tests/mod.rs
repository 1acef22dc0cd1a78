// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod expectation_tests;

use crate::{
    ColumnParamIndexes, Expectation, MutationGroup, MutationTarget, MutationType, TableDelete,
    TableDetails, TableInsert, TableMutation, TableUpdate,
};

/// Creates a two-table target ("person" root plus "person_detail" secondary).
pub fn create_test_target() -> MutationTarget {
    MutationTarget::new("Person", "person", 2, false, true)
}

pub fn create_insert_mutation(table_name: &str, table_index: usize) -> TableMutation {
    let mut value_params = ColumnParamIndexes::new();
    value_params.register("name", 1);
    value_params.register("age", 2);
    let mut key_params = ColumnParamIndexes::new();
    key_params.register("id", 0);
    let details = TableDetails::new(
        table_name,
        format!("insert into {table_name} (id, name, age) values (?, ?, ?)"),
        Expectation::RowCount(1),
        table_index,
        3,
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
        format!("update {table_name} set name = ? where id = ?"),
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
        format!("delete from {table_name} where id = ?"),
        Expectation::RowCount(1),
        table_index,
        1,
    );
    TableMutation::Delete(TableDelete::new(details, restriction_params))
}

/// Creates a two-table insert group over the test target.
pub fn create_insert_group() -> MutationGroup {
    MutationGroup::builder(MutationType::Insert, create_test_target())
        .add(create_insert_mutation("person", 0))
        .add(create_insert_mutation("person_detail", 1))
        .build()
}

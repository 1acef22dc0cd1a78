// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Immutable mutation descriptions for the rowmut engine.
//!
//! This crate defines the read-only model the execution engine consumes:
//! per-table statement descriptions ([`TableMutation`]), the ordered group of
//! tables touched by one logical write ([`MutationGroup`]), and the summary of
//! the entity mapping the group was built for ([`MutationTarget`]).
//!
//! ## Invariants
//!
//! - Model values are built once per (entity mapping, mutation type) pair by
//!   the mapping layer and shared read-only across many logical writes.
//! - In a multi-table group, table index 0 is always the primary (root) table.
//! - Group lookups by table name or table index return `Option`: `None` means
//!   "this table is not part of this mutation" and is valid control flow, not
//!   an error.
//!
//! This crate performs no I/O and defines no error type; malformed model
//! construction is a programming error in the mapping layer.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod column_params;
mod expectation;
mod group;
mod mutation_type;
mod table_mutation;
mod target;

#[cfg(test)]
mod tests;

pub use column_params::ColumnParamIndexes;
pub use expectation::Expectation;
pub use group::{MutationGroup, MutationGroupBuilder};
pub use mutation_type::MutationType;
pub use table_mutation::{
    TableDelete, TableDetails, TableInsert, TableMutation, TableUpdate,
};
pub use target::MutationTarget;

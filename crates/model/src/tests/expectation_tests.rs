// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Expectation, MutationType};

#[test]
fn test_none_expectation_matches_any_count() {
    assert!(Expectation::None.matches(0));
    assert!(Expectation::None.matches(1));
    assert!(Expectation::None.matches(500));
}

#[test]
fn test_row_count_expectation_matches_exact_count_only() {
    let expectation = Expectation::RowCount(1);
    assert!(expectation.matches(1));
    assert!(!expectation.matches(0));
    assert!(!expectation.matches(2));
}

#[test]
fn test_expected_count_is_none_for_unchecked_contract() {
    assert_eq!(Expectation::None.expected_count(), None);
    assert_eq!(Expectation::RowCount(3).expected_count(), Some(3));
}

#[test]
fn test_delete_never_skips_tables() {
    assert!(MutationType::Insert.can_skip_tables());
    assert!(MutationType::Update.can_skip_tables());
    assert!(!MutationType::Delete.can_skip_tables());
}

#[test]
fn test_only_delete_executes_in_reverse_order() {
    assert!(!MutationType::Insert.executes_in_reverse_order());
    assert!(!MutationType::Update.executes_in_reverse_order());
    assert!(MutationType::Delete.executes_in_reverse_order());
}

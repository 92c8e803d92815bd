//! Property tests for the print/parse roundtrip
//!
//! Printing a parsed constraint and reparsing it must give back the same
//! canonical constraint, and printing is a fixed point after one pass.

mod generators;

use kbsdp::{parse_constraint, pretty_print, AtomPool};
use proptest::prelude::*;

proptest! {
    /// parse -> print -> parse yields an equal constraint
    #[test]
    fn reparse_equal(text in generators::arb_constraint_text()) {
        let mut pool = AtomPool::new();
        let first = parse_constraint(&text, &mut pool)
            .map_err(|e| TestCaseError::fail(format!("initial parse failed: {}", e)))?;

        let printed = pretty_print(&first);
        let second = parse_constraint(&printed, &mut pool)
            .map_err(|e| TestCaseError::fail(format!("reparse of `{}` failed: {}", printed, e)))?;

        prop_assert_eq!(first, second, "printed: {}", printed);
    }

    /// Printing is stable after the first pass
    #[test]
    fn print_fixed_point(text in generators::arb_constraint_text()) {
        let mut pool = AtomPool::new();
        let first = parse_constraint(&text, &mut pool)
            .map_err(|e| TestCaseError::fail(format!("initial parse failed: {}", e)))?;
        let printed = pretty_print(&first);
        let reparsed = parse_constraint(&printed, &mut pool)
            .map_err(|e| TestCaseError::fail(format!("reparse failed: {}", e)))?;

        prop_assert_eq!(pretty_print(&reparsed), printed);
    }

    /// A fresh pool gives a structurally equal constraint
    #[test]
    fn reparse_in_fresh_pool(text in generators::arb_constraint_text()) {
        let mut pool = AtomPool::new();
        let first = parse_constraint(&text, &mut pool)
            .map_err(|e| TestCaseError::fail(format!("initial parse failed: {}", e)))?;

        let mut fresh = AtomPool::new();
        let second = parse_constraint(&pretty_print(&first), &mut fresh)
            .map_err(|e| TestCaseError::fail(format!("reparse failed: {}", e)))?;

        prop_assert_eq!(first, second);
    }
}

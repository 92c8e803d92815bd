//! Fuzz the constraint parser
//!
//! Malformed input must come back as a `ParseError`, never a panic.

#![no_main]

use kbsdp::{parse_constraint, AtomPool};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut pool = AtomPool::new();
        if let Ok(constraint) = parse_constraint(input, &mut pool) {
            let _ = constraint.to_string();
        }
    }
});

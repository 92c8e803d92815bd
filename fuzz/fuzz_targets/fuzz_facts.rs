//! Fuzz the fact-line reader

#![no_main]

use kbsdp::facts::FactReader;
use kbsdp::{AtomPool, GroundNames, PredicateSignatures};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let signatures = PredicateSignatures::pathway_defaults();
        let mut names = GroundNames::new();
        let mut pool = AtomPool::new();
        let _ = FactReader::new(&signatures, &mut names, &mut pool).parse_str(input);
    }
});

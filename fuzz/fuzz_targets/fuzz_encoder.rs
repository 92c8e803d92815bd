//! Fuzz the SDPA encoder with arbitrary problem descriptions
//!
//! Anything that deserializes and validates must encode without an
//! internal error.

#![no_main]

use kbsdp::error::EncodeError;
use kbsdp::sdp::{Encoder, SdpProblem};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(problem) = serde_json::from_slice::<SdpProblem>(data) else {
        return;
    };
    if problem.validate().is_err() {
        return;
    }
    if let Err(EncodeError::UnregisteredMonomial(m)) =
        Encoder::new().encode(&problem, "fuzz", std::io::sink())
    {
        panic!("monomial {} missed by the counting pass", m);
    }
});

//! Property tests for the two-pass encoder
//!
//! Whatever the cones, the writing pass must only reference variables and
//! blocks the counting pass announced in the header, and entries must sit
//! inside their block's upper triangle.

mod generators;

use generators::{arb_basis, arb_monomial_key};
use kbsdp::sdp::{Cone, Encoder, ScalarTerm, SdpProblem};
use proptest::collection::vec;
use proptest::prelude::*;

fn arb_scalar_terms(size: usize) -> impl Strategy<Value = Vec<ScalarTerm>> {
    vec(
        (arb_monomial_key(), vec(-3i32..=3, size..=size)),
        0..=3,
    )
    .prop_map(|terms| {
        terms
            .into_iter()
            .map(|(mono, coefs)| ScalarTerm {
                mono,
                coefs: coefs.into_iter().map(f64::from).collect(),
            })
            .collect()
    })
}

fn arb_cone() -> impl Strategy<Value = Cone> {
    prop_oneof![
        arb_basis(4).prop_map(|basis| Cone::Moment { basis }),
        (1usize..=2)
            .prop_flat_map(|size| (Just(size), arb_scalar_terms(size), arb_basis(3)))
            .prop_map(|(size, terms, basis)| Cone::Inequality { size, terms, basis }),
        (1usize..=2)
            .prop_flat_map(|size| (Just(size), arb_scalar_terms(size), arb_basis(3)))
            .prop_map(|(size, terms, basis)| Cone::Equality { size, terms, basis }),
    ]
}

fn parse_header(text: &str) -> (usize, Vec<i64>) {
    let lines: Vec<&str> = text.lines().collect();
    let m_dim = lines[3].parse().unwrap();
    let blocks = lines[5]
        .split_whitespace()
        .map(|b| b.parse().unwrap())
        .collect();
    (m_dim, blocks)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn entries_stay_inside_header(cones in vec(arb_cone(), 0..5)) {
        let problem = SdpProblem { objective: Vec::new(), cones };
        let (summary, out) = Encoder::new().encode(&problem, "prop", Vec::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let (m_dim, blocks) = parse_header(&text);

        prop_assert_eq!(m_dim, summary.m_dim);
        prop_assert_eq!(&blocks, &summary.block_struct);

        let entries: Vec<&str> = text.lines().skip(7).collect();
        prop_assert_eq!(entries.len(), summary.entries_written);
        for line in entries {
            let fields: Vec<&str> = line.split_whitespace().collect();
            prop_assert_eq!(fields.len(), 5);
            let var: usize = fields[0].parse().unwrap();
            let block: usize = fields[1].parse().unwrap();
            let row: usize = fields[2].parse().unwrap();
            let col: usize = fields[3].parse().unwrap();

            prop_assert!(var >= 1 && var <= m_dim, "var {} of {}", var, m_dim);
            prop_assert!(block >= 1 && block <= blocks.len());
            let dim = blocks[block - 1].unsigned_abs() as usize;
            prop_assert!(row >= 1 && row <= col && col <= dim, "{} in block of {}", line, dim);
            if blocks[block - 1] < 0 {
                prop_assert_eq!(row, col);
            }
        }
    }

    /// The counting pass alone predicts the header exactly
    #[test]
    fn count_matches_encode(cones in vec(arb_cone(), 0..5)) {
        let problem = SdpProblem { objective: Vec::new(), cones };
        let counted = Encoder::new().count(&problem).unwrap();
        let (encoded, _) = Encoder::new().encode(&problem, "prop", std::io::sink()).unwrap();

        prop_assert_eq!(counted.m_dim, encoded.m_dim);
        prop_assert_eq!(counted.block_struct, encoded.block_struct);
    }
}

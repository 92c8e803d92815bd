//! SDPA sparse-format writing

use std::fmt;
use std::io::{self, Write};

use crate::id::{BlockId, SdpVar};

/// A float printed like C's `%.15e`: 15 fractional digits and an exponent
/// with explicit sign and at least two digits (`-4.000000000000000e+00`).
#[derive(Clone, Copy, Debug)]
pub struct Sci(pub f64);

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.0;
        if x.is_nan() {
            return f.write_str("nan");
        }
        if x.is_infinite() {
            return f.write_str(if x < 0.0 { "-inf" } else { "inf" });
        }
        let s = format!("{:.15e}", x);
        match s.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                if digits.len() < 2 {
                    write!(f, "{}e{}0{}", mantissa, sign, digits)
                } else {
                    write!(f, "{}e{}{}", mantissa, sign, digits)
                }
            }
            None => f.write_str(&s),
        }
    }
}

/// Header: three `*` comment lines, `mDim`, block count, block structure,
/// objective coefficients.
pub fn write_header<W: Write>(
    w: &mut W,
    name: &str,
    m_dim: usize,
    block_struct: &[i64],
    objective: &[f64],
) -> io::Result<()> {
    writeln!(w, "* SDPA sparse format data")?;
    writeln!(w, "* File name = {}", name)?;
    writeln!(w, "* mDim = {}, nBlock = {}", m_dim, block_struct.len())?;
    writeln!(w, "{}", m_dim)?;
    writeln!(w, "{}", block_struct.len())?;
    for size in block_struct {
        write!(w, "{} ", size)?;
    }
    writeln!(w)?;
    for c in objective {
        write!(w, "{} ", Sci(*c))?;
    }
    writeln!(w)
}

/// One `<var> <block> <row> <col> <value>` line.
pub fn write_entry<W: Write>(
    w: &mut W,
    var: SdpVar,
    block: BlockId,
    row: usize,
    col: usize,
    value: f64,
) -> io::Result<()> {
    writeln!(w, "{} {} {} {} {}", var, block, row, col, Sci(value))
}

//! Shared state of the two-pass encoder
//!
//! The same `StreamingContext` is driven through both passes. During
//! `Pass::Counting` every emitted entry registers its monomial and every
//! block records its size; nothing is written. `begin_writing` freezes the
//! monomial map and attaches the sink; during `Pass::Writing` the identical
//! walk looks monomials up and streams entries out.

use std::io::Write;

use indexmap::IndexSet;

use crate::error::EncodeError;
use crate::id::{BlockId, SdpVar};
use crate::sdp::format;
use crate::sdp::key::MonomialKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Counting,
    Writing,
}

pub struct StreamingContext<W: Write> {
    /// Monomial → SDP variable number (position + 1), first-seen order
    monomials: IndexSet<MonomialKey>,
    /// Signed block sizes, negative = diagonal
    block_struct: Vec<i64>,
    pass: Pass,
    /// Blocks started so far in the current pass
    current_block: BlockId,
    /// Objective coefficient per SDP variable, sized at the transition
    obj_coef: Vec<f64>,
    sink: Option<W>,
    entries_written: usize,
    threshold: f64,
}

impl<W: Write> StreamingContext<W> {
    pub fn new(threshold: f64) -> Self {
        Self {
            monomials: IndexSet::new(),
            block_struct: Vec::new(),
            pass: Pass::Counting,
            current_block: 0,
            obj_coef: Vec::new(),
            sink: None,
            entries_written: 0,
            threshold,
        }
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn is_counting(&self) -> bool {
        self.pass == Pass::Counting
    }

    /// Number of SDP variables registered so far.
    pub fn m_dim(&self) -> usize {
        self.monomials.len()
    }

    pub fn block_struct(&self) -> &[i64] {
        &self.block_struct
    }

    pub fn entries_written(&self) -> usize {
        self.entries_written
    }

    /// True if `c` is above the noise threshold.
    pub fn is_significant(&self, c: f64) -> bool {
        c.abs() > self.threshold
    }

    /// Variable number of `key`, assigning the next one on first sight.
    pub fn register_monomial(&mut self, key: MonomialKey) -> SdpVar {
        let (idx, _) = self.monomials.insert_full(key);
        idx + 1
    }

    /// Variable number of a monomial registered in the counting pass.
    pub fn var_number(&self, key: &MonomialKey) -> Result<SdpVar, EncodeError> {
        self.monomials
            .get_index_of(key)
            .map(|idx| idx + 1)
            .ok_or_else(|| EncodeError::UnregisteredMonomial(key.to_string()))
    }

    /// Open the next block. The counting pass records its size; the writing
    /// pass only advances the block number.
    pub fn start_block(&mut self, size: i64) -> BlockId {
        self.current_block += 1;
        match self.pass {
            Pass::Counting => self.block_struct.push(size),
            Pass::Writing => debug_assert_eq!(
                self.block_struct.get(self.current_block - 1),
                Some(&size),
                "block walk diverged between passes"
            ),
        }
        self.current_block
    }

    /// Register (counting) or write (writing) one matrix entry.
    pub fn emit(
        &mut self,
        key: MonomialKey,
        block: BlockId,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<(), EncodeError> {
        match self.pass {
            Pass::Counting => {
                self.register_monomial(key);
                Ok(())
            }
            Pass::Writing => {
                let var = self.var_number(&key)?;
                self.write_entry(var, block, row, col, value)
            }
        }
    }

    fn write_entry(
        &mut self,
        var: SdpVar,
        block: BlockId,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<(), EncodeError> {
        if value == 0.0 {
            return Ok(());
        }
        if let Some(sink) = self.sink.as_mut() {
            format::write_entry(sink, var, block, row, col, value)?;
            self.entries_written += 1;
        }
        Ok(())
    }

    /// Freeze the variable count and switch to the writing pass.
    pub fn begin_writing(&mut self, sink: W) {
        self.obj_coef = vec![0.0; self.monomials.len()];
        self.pass = Pass::Writing;
        self.current_block = 0;
        self.sink = Some(sink);
    }

    /// Accumulate an objective coefficient (writing pass, before the header).
    pub fn add_objective(&mut self, key: &MonomialKey, coef: f64) -> Result<(), EncodeError> {
        let var = self.var_number(key)?;
        self.obj_coef[var - 1] += coef;
        Ok(())
    }

    pub fn write_header(&mut self, name: &str) -> Result<(), EncodeError> {
        if let Some(sink) = self.sink.as_mut() {
            format::write_header(
                sink,
                name,
                self.monomials.len(),
                &self.block_struct,
                &self.obj_coef,
            )?;
        }
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> Result<Option<W>, EncodeError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(self.sink.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_one_based_and_idempotent() {
        let mut ctx: StreamingContext<Vec<u8>> = StreamingContext::new(1e-12);
        let m1 = MonomialKey::new(vec![(1, 2), (3, 1)]);
        let m2 = MonomialKey::var(2);
        let m4 = MonomialKey::new(vec![(1, 2), (3, 1), (2, 1)]);
        assert_eq!(ctx.register_monomial(m1.clone()), 1);
        assert_eq!(ctx.register_monomial(m2), 2);
        assert_eq!(ctx.register_monomial(m1), 1);
        assert_eq!(ctx.register_monomial(m4), 3);
        assert_eq!(ctx.m_dim(), 3);
    }

    #[test]
    fn blocks_are_recorded_once() {
        let mut ctx: StreamingContext<Vec<u8>> = StreamingContext::new(1e-12);
        for size in [3, -2, 20, 3] {
            ctx.start_block(size);
        }
        assert_eq!(ctx.block_struct(), &[3, -2, 20, 3]);
        ctx.begin_writing(Vec::new());
        assert_eq!(ctx.start_block(3), 1);
        assert_eq!(ctx.block_struct().len(), 4);
    }

    #[test]
    fn lookup_miss_is_internal_error() {
        let mut ctx: StreamingContext<Vec<u8>> = StreamingContext::new(1e-12);
        ctx.begin_writing(Vec::new());
        let err = ctx.emit(MonomialKey::var(7), 1, 1, 1, 1.0).unwrap_err();
        assert!(matches!(err, EncodeError::UnregisteredMonomial(_)));
    }
}

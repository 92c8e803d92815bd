//! Streaming SDPA encoder
//!
//! Converts an `SdpProblem` (objective plus ordered cones over numeric
//! monomials) into an SDPA sparse file without materializing the expanded
//! problem:
//!
//! - pass 1 walks every cone, registering each distinct monomial as an SDP
//!   variable (1-based, first-seen order) and recording block sizes
//! - the transition sizes the objective vector and writes the header
//! - pass 2 re-walks the same cones in the same order and streams entries
//!
//! Coefficients at or below the noise threshold are skipped identically in
//! both passes.

pub mod cones;
pub mod context;
pub mod format;
pub mod key;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::EncodeError;

pub use cones::{Cone, MatrixEntry, MatrixTerm, ObjectiveTerm, ScalarTerm, SdpProblem};
pub use context::{Pass, StreamingContext};
pub use key::MonomialKey;

/// Default magnitude at or below which a coefficient is treated as zero.
pub const NOISE_THRESHOLD: f64 = 1e-12;

/// What an encoding run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EncodeSummary {
    pub m_dim: usize,
    pub block_struct: Vec<i64>,
    pub entries_written: usize,
}

impl SdpProblem {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read a problem description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EncodeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| EncodeError::Problem {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), EncodeError> {
        self.cones
            .iter()
            .enumerate()
            .try_for_each(|(i, cone)| cone.validate(i))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    threshold: f64,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            threshold: NOISE_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    fn count_into<W: Write>(
        &self,
        ctx: &mut StreamingContext<W>,
        problem: &SdpProblem,
    ) -> Result<(), EncodeError> {
        cones::walk_objective(ctx, &problem.objective)?;
        for (i, cone) in problem.cones.iter().enumerate() {
            cones::walk_cone(ctx, i, cone)?;
        }
        Ok(())
    }

    /// Run the counting pass only.
    pub fn count(&self, problem: &SdpProblem) -> Result<EncodeSummary, EncodeError> {
        problem.validate()?;
        let mut ctx: StreamingContext<std::io::Sink> = StreamingContext::new(self.threshold);
        self.count_into(&mut ctx, problem)?;
        Ok(EncodeSummary {
            m_dim: ctx.m_dim(),
            block_struct: ctx.block_struct().to_vec(),
            entries_written: 0,
        })
    }

    /// Encode `problem` into `sink`, naming it `name` in the header.
    /// Returns the summary and the flushed sink.
    pub fn encode<W: Write>(
        &self,
        problem: &SdpProblem,
        name: &str,
        sink: W,
    ) -> Result<(EncodeSummary, W), EncodeError> {
        problem.validate()?;
        let mut ctx = StreamingContext::new(self.threshold);

        // Pass 1
        self.count_into(&mut ctx, problem)?;
        info!(
            m_dim = ctx.m_dim(),
            blocks = ctx.block_struct().len(),
            "counting pass complete"
        );

        // Transition
        ctx.begin_writing(sink);
        cones::walk_objective(&mut ctx, &problem.objective)?;
        ctx.write_header(name)?;

        // Pass 2
        for (i, cone) in problem.cones.iter().enumerate() {
            cones::walk_cone(&mut ctx, i, cone)?;
        }

        let summary = EncodeSummary {
            m_dim: ctx.m_dim(),
            block_struct: ctx.block_struct().to_vec(),
            entries_written: ctx.entries_written(),
        };
        debug!(entries = summary.entries_written, "writing pass complete");
        match ctx.finish()? {
            Some(sink) => Ok((summary, sink)),
            None => Err(EncodeError::Write(std::io::Error::new(
                std::io::ErrorKind::Other,
                "output sink was detached before the writing pass finished",
            ))),
        }
    }

    /// Encode `problem` into the file at `path`.
    pub fn encode_to_file(
        &self,
        problem: &SdpProblem,
        path: impl AsRef<Path>,
    ) -> Result<EncodeSummary, EncodeError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (summary, _) = self.encode(problem, &path.display().to_string(), BufWriter::new(file))?;
        info!(
            path = %path.display(),
            m_dim = summary.m_dim,
            entries = summary.entries_written,
            "wrote SDPA file"
        );
        Ok(summary)
    }
}

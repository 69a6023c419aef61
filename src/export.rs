//! Matrix export boundary
//!
//! Image plotting stays outside this crate; `MatrixExporter` is the seam a
//! renderer plugs into. The shipped implementation writes the dense grid as
//! CSV rows, optionally epsilon-shifting every cell so a downstream
//! log-scale colour map has no zeros.

use std::io::Write;

use crate::delta::DenseMatrix;
use crate::errors::Result;

/// Shift applied to cells destined for logarithmic colour scales
pub const LOG_SHIFT: f64 = 1.0e-8;

/// Consumes a computed dense matrix for downstream rendering
pub trait MatrixExporter {
    fn export(&self, matrix: &DenseMatrix, out: &mut dyn Write) -> Result<()>;
}

/// Writes the dense matrix as CSV, one line per source rank
#[derive(Debug, Clone, Copy)]
pub struct CsvMatrixExporter {
    shift: f64,
}

impl CsvMatrixExporter {
    /// Exporter with the log-scale epsilon shift (plot mode)
    pub fn shifted() -> Self {
        Self { shift: LOG_SHIFT }
    }

    /// Exporter without a shift (delta mode, where cells may be negative)
    pub fn plain() -> Self {
        Self { shift: 0.0 }
    }
}

impl MatrixExporter for CsvMatrixExporter {
    fn export(&self, matrix: &DenseMatrix, out: &mut dyn Write) -> Result<()> {
        for source in 0..matrix.dim() {
            let cells: Vec<String> = matrix
                .row(source)
                .iter()
                .map(|&value| format!("{:e}", value + self.shift))
                .collect();
            writeln!(out, "{}", cells.join(","))?;
        }
        Ok(())
    }
}

//! Dense materialization and mosaic differencing
//!
//! Delta analysis compares two runs of the same workload: both mosaics are
//! materialized over their full rank universe (absent pairs become zero) and
//! subtracted elementwise, reference minus test.

use crate::errors::{PatError, Result};
use crate::mosaic::Mosaic;

/// Row-major N x N dense matrix, zero-defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Matrix dimension (rank universe size)
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn get(&self, source: usize, dest: usize) -> f64 {
        self.data[source * self.n + dest]
    }

    pub fn set(&mut self, source: usize, dest: usize, value: f64) {
        self.data[source * self.n + dest] = value;
    }

    /// One source rank's row
    pub fn row(&self, source: usize) -> &[f64] {
        &self.data[source * self.n..(source + 1) * self.n]
    }

    /// Materialize a sparse mosaic, defaulting unset entries to zero
    ///
    /// The dimension is the mosaic's full rank universe, so destinations
    /// larger than any source still fit.
    pub fn from_mosaic(mosaic: &Mosaic) -> Self {
        let mut matrix = Self::zeros(mosaic.rank_count());
        for (source, pairs) in mosaic.iter() {
            for &(dest, metric) in pairs {
                matrix.set(source, dest, metric);
            }
        }
        matrix
    }
}

/// Elementwise reference-minus-test difference of two mosaics
///
/// A pair present in only one mosaic is treated as zero in the other. Mosaics
/// over different rank universes are a size mismatch, never silently
/// truncated or padded.
pub fn delta(reference: &Mosaic, test: &Mosaic) -> Result<DenseMatrix> {
    let ref_matrix = DenseMatrix::from_mosaic(reference);
    let test_matrix = DenseMatrix::from_mosaic(test);

    if ref_matrix.dim() != test_matrix.dim() {
        return Err(PatError::SizeMismatch {
            reference: ref_matrix.dim(),
            test: test_matrix.dim(),
        });
    }

    let data = ref_matrix
        .data
        .iter()
        .zip(test_matrix.data.iter())
        .map(|(&r, &t)| r - t)
        .collect();

    Ok(DenseMatrix {
        n: ref_matrix.n,
        data,
    })
}

use crate::candle_sparse_tensor::SparseTensor;
use crate::error::{Result, SparseDataError};
use crate::sparse_collate::SparseBatch;
use candle_core::Device;
use log::info;
use matrix_util::csr_util::CsrMatrix;
use matrix_util::mtx_io::read_mtx_csr;
use matrix_util::traits::IntoCsrF32;

/// Stored column indices and values of one row of one matrix, in
/// stored order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

impl SparseRow {
    pub fn new(indices: Vec<usize>, values: Vec<f32>) -> Self {
        SparseRow { indices, values }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Feature row `x` and label row `y` of one sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseSample {
    pub x: SparseRow,
    pub y: SparseRow,
}

/// Per-task counts of stored labels
#[derive(Debug, Clone, PartialEq)]
pub struct TaskLabelCounts {
    pub positives: Vec<usize>,
    pub negatives: Vec<usize>,
}

///
/// Row-aligned sparse features `X` [samples x features] and labels `Y`
/// [samples x tasks], both row-compressed `f32`.
///
/// Labels arrive on {-1, +1} and are kept on {0, 1}. A stored label,
/// even a stored zero, means "observed"; a missing entry means
/// "not measured".
///
/// The dataset owns both matrices and never mutates them after
/// construction, so it can be shared across threads as is.
///
pub struct SparseDataset {
    x: CsrMatrix<f32>,
    y: CsrMatrix<f32>,
}

impl SparseDataset {
    ///
    /// Take ownership of the features `x` and labels `y`.
    ///
    /// Both are converted to row-compressed `f32` (index buffers of
    /// row-compressed input are reused) and every stored label `v`
    /// becomes `(v + 1) / 2`. Callers who still need their original
    /// label matrix should pass a clone.
    ///
    /// Column indices of each row are stored sorted and unique, so
    /// `get_row` returns them in ascending order whatever order the
    /// input carried. Repeated `(row, col)` entries of triplet, COO or
    /// raw-array input are summed.
    ///
    pub fn new<X, Y>(x: X, y: Y) -> Result<Self>
    where
        X: IntoCsrF32,
        Y: IntoCsrF32,
    {
        let x = x.into_csr_f32()?;
        let mut y = y.into_csr_f32()?;

        if x.nrows() != y.nrows() {
            return Err(SparseDataError::shape_mismatch(
                "rows of Y (must match rows of X)",
                x.nrows(),
                y.nrows(),
            ));
        }

        // {-1, +1} -> {0, 1}; only values change, explicit zeros stay
        for y_ij in y.values_mut() {
            *y_ij = (*y_ij + 1.0) / 2.0;
        }

        info!(
            "dataset: {} samples, {} features ({} nnz), {} tasks ({} labels)",
            x.nrows(),
            x.ncols(),
            x.nnz(),
            y.ncols(),
            y.nnz()
        );

        Ok(SparseDataset { x, y })
    }

    /// Read `X` and `Y` from MatrixMarket files (plain or gzipped)
    pub fn from_mtx_files(x_file: &str, y_file: &str) -> Result<Self> {
        info!("reading features from {}", x_file);
        let x = read_mtx_csr(x_file)?;
        info!("reading labels from {}", y_file);
        let y = read_mtx_csr(y_file)?;
        Self::new(x, y)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of input features (columns of `X`)
    pub fn input_size(&self) -> usize {
        self.x.ncols()
    }

    /// Number of tasks (columns of `Y`)
    pub fn output_size(&self) -> usize {
        self.y.ncols()
    }

    pub fn nnz_x(&self) -> usize {
        self.x.nnz()
    }

    pub fn nnz_y(&self) -> usize {
        self.y.nnz()
    }

    pub fn features(&self) -> &CsrMatrix<f32> {
        &self.x
    }

    /// Labels after the {0, 1} rescaling
    pub fn labels(&self) -> &CsrMatrix<f32> {
        &self.y
    }

    ///
    /// Copy out the stored entries of sample `idx` from `X` and `Y`
    ///
    pub fn get_row(&self, idx: usize) -> Result<SparseSample> {
        if idx >= self.len() {
            return Err(SparseDataError::IndexOutOfRange {
                index: idx,
                len: self.len(),
            });
        }

        Ok(SparseSample {
            x: take_row(&self.x, idx),
            y: take_row(&self.y, idx),
        })
    }

    /// Sparse tensor `[batch_size, input_size]` of a collated batch
    pub fn batch_to_x(&self, batch: &SparseBatch, dev: &Device) -> Result<SparseTensor> {
        batch
            .x
            .to_sparse_tensor(batch.batch_size, self.input_size(), dev)
    }

    /// Sparse tensor `[batch_size, output_size]` of a collated batch
    pub fn batch_to_y(&self, batch: &SparseBatch, dev: &Device) -> Result<SparseTensor> {
        batch
            .y
            .to_sparse_tensor(batch.batch_size, self.output_size(), dev)
    }

    /// Count stored positive (> 0.5) and negative labels of each task.
    /// A stored 0.5, i.e. an explicit 0 in the {-1, +1} input, is
    /// counted as negative.
    pub fn task_label_counts(&self) -> TaskLabelCounts {
        let ntasks = self.output_size();
        let mut counts = TaskLabelCounts {
            positives: vec![0; ntasks],
            negatives: vec![0; ntasks],
        };

        for (_, k, &y_ik) in self.y.triplet_iter() {
            if y_ik > 0.5 {
                counts.positives[k] += 1;
            } else {
                counts.negatives[k] += 1;
            }
        }
        counts
    }
}

// `idx` must be a valid row
fn take_row(csr: &CsrMatrix<f32>, idx: usize) -> SparseRow {
    let offsets = csr.row_offsets();
    let (start, end) = (offsets[idx], offsets[idx + 1]);

    SparseRow {
        indices: csr.col_indices()[start..end].to_vec(),
        values: csr.values()[start..end].to_vec(),
    }
}

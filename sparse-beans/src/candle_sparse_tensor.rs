use crate::error::{Result, SparseDataError};
use crate::sparse_collate::SparseCoo;
use candle_core::{Device, Tensor};

///
/// Coordinate-format sparse tensor parts living on a device.
///
/// * `indices` - `[2, nnz]` `i64`, batch-local rows then columns
/// * `values` - `[nnz]` `f32`
/// * `shape` - logical `(rows, columns)` of the sparse matrix
///
#[derive(Debug, Clone)]
pub struct SparseTensor {
    pub indices: Tensor,
    pub values: Tensor,
    pub shape: (usize, usize),
}

impl SparseTensor {
    pub fn nnz(&self) -> Result<usize> {
        Ok(self.values.dims1()?)
    }

    pub fn device(&self) -> &Device {
        self.values.device()
    }

    pub fn to_device(&self, target_device: &Device) -> Result<Self> {
        Ok(SparseTensor {
            indices: self.indices.to_device(target_device)?,
            values: self.values.to_device(target_device)?,
            shape: self.shape,
        })
    }
}

impl SparseCoo {
    ///
    /// Move already batch-local coordinates onto `dev` as a sparse
    /// tensor of shape `[nrows, ncols]`. Only the lengths of the three
    /// sequences are checked; the coordinates are taken as they are.
    ///
    pub fn to_sparse_tensor(
        &self,
        nrows: usize,
        ncols: usize,
        dev: &Device,
    ) -> Result<SparseTensor> {
        let nnz = self.values.len();
        if self.rows.len() != nnz {
            return Err(SparseDataError::shape_mismatch(
                "row ids of a sparse tensor",
                nnz,
                self.rows.len(),
            ));
        }
        if self.cols.len() != nnz {
            return Err(SparseDataError::shape_mismatch(
                "column ids of a sparse tensor",
                nnz,
                self.cols.len(),
            ));
        }

        let mut indices = Vec::with_capacity(2 * nnz);
        indices.extend_from_slice(&self.rows);
        indices.extend_from_slice(&self.cols);

        Ok(SparseTensor {
            indices: Tensor::from_vec(indices, (2, nnz), dev)?,
            values: Tensor::from_slice(&self.values, (nnz,), dev)?,
            shape: (nrows, ncols),
        })
    }
}

use crate::traits::*;
use nalgebra::Scalar;
pub use nalgebra_sparse::{coo::CooMatrix, csc::CscMatrix, csr::CsrMatrix};
use nalgebra_sparse::SparseFormatError;
use num_traits::AsPrimitive;
use rayon::prelude::*;

/// A sparse matrix given as its shape and `(row, col, value)` triplets
#[derive(Debug, Clone)]
pub struct SparseTriplets<T> {
    pub nrows: usize,
    pub ncols: usize,
    pub triplets: Vec<(usize, usize, T)>,
}

///
/// Raw row-compressed arrays: `row_offsets` (length `nrows + 1`),
/// `col_indices` and `values`. Column indices inside a row may come in
/// any order.
///
#[derive(Debug, Clone)]
pub struct RawCsr<T> {
    pub nrows: usize,
    pub ncols: usize,
    pub row_offsets: Vec<usize>,
    pub col_indices: Vec<usize>,
    pub values: Vec<T>,
}

/// `SparseFormatError` carries a non-`Send` source, so keep its message
pub fn sparse_format_err(e: SparseFormatError) -> anyhow::Error {
    anyhow::anyhow!("invalid sparse matrix: {}", e)
}

impl<T> SparseTriplets<T> {
    pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, T)>) -> Self {
        SparseTriplets {
            nrows,
            ncols,
            triplets,
        }
    }
}

///
/// Compress `(row, col, value)` triplets into a row-compressed matrix.
///
/// * Zero-valued triplets are kept as stored entries.
/// * Repeated `(row, col)` pairs are summed into one entry.
/// * Any index outside `nrows x ncols` is an error.
///
pub fn csr_from_triplets(
    nrows: usize,
    ncols: usize,
    mut triplets: Vec<(usize, usize, f32)>,
) -> anyhow::Result<CsrMatrix<f32>> {
    if let Some(&(i, j, _)) = triplets.iter().find(|&&(i, j, _)| i >= nrows || j >= ncols) {
        anyhow::bail!(
            "triplet ({}, {}) is out of range for a {} x {} matrix",
            i,
            j,
            nrows,
            ncols
        );
    }

    if triplets.len() > 100_000 {
        triplets.par_sort_by_key(|&(i, j, _)| (i, j));
    } else {
        triplets.sort_by_key(|&(i, j, _)| (i, j));
    }

    let mut row_offsets = vec![0_usize; nrows + 1];
    let mut col_indices = Vec::with_capacity(triplets.len());
    let mut values: Vec<f32> = Vec::with_capacity(triplets.len());
    let mut prev: Option<(usize, usize)> = None;

    for (i, j, x_ij) in triplets {
        if prev == Some((i, j)) {
            if let Some(x) = values.last_mut() {
                *x += x_ij;
            }
            continue;
        }
        row_offsets[i + 1] += 1;
        col_indices.push(j);
        values.push(x_ij);
        prev = Some((i, j));
    }

    for i in 0..nrows {
        row_offsets[i + 1] += row_offsets[i];
    }

    Ok(CsrMatrix::try_from_csr_data(
        nrows,
        ncols,
        row_offsets,
        col_indices,
        values,
    )
    .map_err(sparse_format_err)?)
}

fn cast_values<T>(values: Vec<T>) -> Vec<f32>
where
    T: AsPrimitive<f32>,
{
    // same-size element types are collected in place
    values.into_iter().map(|x| x.as_()).collect()
}

impl<T> IntoCsrF32 for CsrMatrix<T>
where
    T: Scalar + AsPrimitive<f32>,
{
    fn into_csr_f32(self) -> anyhow::Result<CsrMatrix<f32>> {
        let (nrows, ncols) = (self.nrows(), self.ncols());
        let (row_offsets, col_indices, values) = self.disassemble();
        Ok(CsrMatrix::try_from_csr_data(
            nrows,
            ncols,
            row_offsets,
            col_indices,
            cast_values(values),
        )
        .map_err(sparse_format_err)?)
    }
}

impl<T> IntoCsrF32 for CscMatrix<T>
where
    T: Scalar + AsPrimitive<f32>,
{
    fn into_csr_f32(self) -> anyhow::Result<CsrMatrix<f32>> {
        let (nrows, ncols) = (self.nrows(), self.ncols());
        let (col_offsets, row_indices, values) = self.disassemble();

        // the column-compressed arrays of A are the row-compressed arrays of A^T
        let transposed = CsrMatrix::try_from_csr_data(
            ncols,
            nrows,
            col_offsets,
            row_indices,
            cast_values(values),
        )
        .map_err(sparse_format_err)?;
        Ok(transposed.transpose())
    }
}

impl<T> IntoCsrF32 for CooMatrix<T>
where
    T: Scalar + AsPrimitive<f32>,
{
    fn into_csr_f32(self) -> anyhow::Result<CsrMatrix<f32>> {
        let triplets = self
            .triplet_iter()
            .map(|(i, j, &x_ij)| (i, j, x_ij.as_()))
            .collect();
        csr_from_triplets(self.nrows(), self.ncols(), triplets)
    }
}

impl<T> IntoCsrF32 for SparseTriplets<T>
where
    T: AsPrimitive<f32>,
{
    fn into_csr_f32(self) -> anyhow::Result<CsrMatrix<f32>> {
        let triplets = self
            .triplets
            .into_iter()
            .map(|(i, j, x_ij)| (i, j, x_ij.as_()))
            .collect();
        csr_from_triplets(self.nrows, self.ncols, triplets)
    }
}

impl<T> IntoCsrF32 for RawCsr<T>
where
    T: AsPrimitive<f32>,
{
    fn into_csr_f32(self) -> anyhow::Result<CsrMatrix<f32>> {
        let offsets = &self.row_offsets;
        let nnz = self.col_indices.len();

        if offsets.len() != self.nrows + 1 {
            anyhow::bail!(
                "{} row offsets for {} rows",
                offsets.len(),
                self.nrows
            );
        }
        if self.values.len() != nnz {
            anyhow::bail!("{} column indices vs. {} values", nnz, self.values.len());
        }
        if offsets[0] != 0 || offsets[self.nrows] != nnz {
            anyhow::bail!("row offsets must run from 0 to {}", nnz);
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            anyhow::bail!("row offsets must be non-decreasing");
        }

        let mut triplets = Vec::with_capacity(nnz);
        for i in 0..self.nrows {
            for k in offsets[i]..offsets[i + 1] {
                triplets.push((i, self.col_indices[k], self.values[k].as_()));
            }
        }
        csr_from_triplets(self.nrows, self.ncols, triplets)
    }
}

impl MatTriplets for CsrMatrix<f32> {
    type Mat = Self;
    type Scalar = f32;

    fn from_nonzero_triplets(
        nrow: usize,
        ncol: usize,
        triplets: Vec<(usize, usize, Self::Scalar)>,
    ) -> anyhow::Result<Self::Mat> {
        csr_from_triplets(nrow, ncol, triplets)
    }

    fn to_nonzero_triplets(
        &self,
    ) -> anyhow::Result<(usize, usize, Vec<(usize, usize, Self::Scalar)>)> {
        Ok((
            self.nrows(),
            self.ncols(),
            self.triplet_iter().map(|(i, j, &x_ij)| (i, j, x_ij)).collect(),
        ))
    }
}

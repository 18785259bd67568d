use nalgebra_sparse::CsrMatrix;

/// Convert to and from the vector of triplets
pub trait MatTriplets {
    type Mat;
    type Scalar;

    /// Build a matrix from `(row, col, value)` triplets. Every triplet
    /// becomes a stored entry, even when its value is zero.
    fn from_nonzero_triplets(
        nrow: usize,
        ncol: usize,
        triplets: Vec<(usize, usize, Self::Scalar)>,
    ) -> anyhow::Result<Self::Mat>;

    /// Dump the stored entries as `(nrow, ncol, triplets)`
    fn to_nonzero_triplets(
        &self,
    ) -> anyhow::Result<(usize, usize, Vec<(usize, usize, Self::Scalar)>)>;
}

/// Take ownership of a sparse matrix and turn it into a row-compressed
/// `f32` matrix. Already row-compressed input keeps its index buffers.
pub trait IntoCsrF32 {
    fn into_csr_f32(self) -> anyhow::Result<CsrMatrix<f32>>;
}

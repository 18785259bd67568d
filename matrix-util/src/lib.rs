pub mod common_io; // buffered (gzipped) file I/O
pub mod csr_util; // conversion into row-compressed f32 matrices
pub mod mtx_io; // MatrixMarket coordinate files
pub mod traits;

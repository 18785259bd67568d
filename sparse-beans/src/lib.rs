pub mod candle_sparse_tensor; // sparse batches as candle tensors
pub mod cli;
pub mod error;
pub mod sparse_collate; // merge single-row extracts into a batch
pub mod sparse_data_loader; // minibatches over a dataset
pub mod sparse_dataset; // row-compressed features and labels

pub use candle_core;

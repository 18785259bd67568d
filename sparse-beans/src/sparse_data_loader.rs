use crate::candle_sparse_tensor::SparseTensor;
use crate::error::{Result, SparseDataError};
use crate::sparse_collate::{sparse_collate, SparseBatch};
use crate::sparse_dataset::{SparseDataset, SparseSample};
use candle_core::Device;
use log::debug;
use rand::prelude::SliceRandom;
use rayon::prelude::*;

pub struct MinibatchTensors {
    pub x: SparseTensor,
    pub y: SparseTensor,
    pub batch_size: usize,
}

/// `DataLoader` for minibatch learning
pub trait DataLoader {
    fn minibatch_data(&self, batch_idx: usize) -> Result<SparseBatch>;

    fn minibatch_tensors(
        &self,
        batch_idx: usize,
        target_device: &Device,
    ) -> Result<MinibatchTensors>;

    fn num_minibatch(&self) -> usize;

    fn shuffle_minibatch(&mut self, batch_size: usize) -> Result<()>;
}

///
/// A helper `struct` for ordering samples and cutting them into
/// minibatches; after `shuffle_minibatch` or `sequential_minibatch`
/// is called, `chunks` partition the sample indexes.
///
pub struct Minibatches {
    samples: Vec<usize>,
    pub chunks: Vec<Vec<usize>>,
}

impl Minibatches {
    pub fn new(size: usize) -> Self {
        Minibatches {
            samples: (0..size).collect(),
            chunks: vec![],
        }
    }

    /// Random order, then contiguous chunks of `batch_size`
    pub fn shuffle_minibatch(&mut self, batch_size: usize) -> Result<()> {
        let mut rng = rand::rng();
        self.samples.shuffle(&mut rng);
        self.cut(batch_size)
    }

    /// Sample order `0, 1, ..`, then contiguous chunks of `batch_size`
    pub fn sequential_minibatch(&mut self, batch_size: usize) -> Result<()> {
        self.samples.sort_unstable();
        self.cut(batch_size)
    }

    // the last chunk may be shorter
    fn cut(&mut self, batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(SparseDataError::InvalidBatchSize);
        }
        self.chunks = self
            .samples
            .chunks(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.samples.len()
    }
}

///
/// Minibatches over a `SparseDataset`: each batch is a set of
/// `get_row` calls followed by `sparse_collate`.
///
pub struct SparseDataLoader<'a> {
    data: &'a SparseDataset,
    minibatches: Minibatches,
}

impl<'a> SparseDataLoader<'a> {
    pub fn new(data: &'a SparseDataset) -> Self {
        SparseDataLoader {
            data,
            minibatches: Minibatches::new(data.len()),
        }
    }

    /// Cut batches without shuffling
    pub fn sequential_minibatch(&mut self, batch_size: usize) -> Result<()> {
        self.minibatches.sequential_minibatch(batch_size)?;
        debug!(
            "{} sequential minibatches of size {}",
            self.num_minibatch(),
            batch_size
        );
        Ok(())
    }

    /// Sample indexes of minibatch `batch_idx`
    pub fn minibatch_samples(&self, batch_idx: usize) -> Result<&[usize]> {
        self.minibatches
            .chunks
            .get(batch_idx)
            .map(|chunk| chunk.as_slice())
            .ok_or(SparseDataError::IndexOutOfRange {
                index: batch_idx,
                len: self.num_minibatch(),
            })
    }
}

impl DataLoader for SparseDataLoader<'_> {
    fn minibatch_data(&self, batch_idx: usize) -> Result<SparseBatch> {
        let samples = self
            .minibatch_samples(batch_idx)?
            .par_iter()
            .map(|&i| self.data.get_row(i))
            .collect::<Result<Vec<SparseSample>>>()?;

        let batch = sparse_collate(&samples)?;

        debug!(
            "minibatch {}: {} samples, {} features, {} labels",
            batch_idx,
            batch.batch_size,
            batch.x.nnz(),
            batch.y.nnz()
        );
        Ok(batch)
    }

    fn minibatch_tensors(
        &self,
        batch_idx: usize,
        target_device: &Device,
    ) -> Result<MinibatchTensors> {
        let batch = self.minibatch_data(batch_idx)?;
        Ok(MinibatchTensors {
            x: self.data.batch_to_x(&batch, target_device)?,
            y: self.data.batch_to_y(&batch, target_device)?,
            batch_size: batch.batch_size,
        })
    }

    fn num_minibatch(&self) -> usize {
        self.minibatches.chunks.len()
    }

    fn shuffle_minibatch(&mut self, batch_size: usize) -> Result<()> {
        self.minibatches.shuffle_minibatch(batch_size)?;
        debug!(
            "{} shuffled minibatches of size {}",
            self.num_minibatch(),
            batch_size
        );
        Ok(())
    }
}

use crate::sparse_data_loader::{DataLoader, SparseDataLoader};
use crate::sparse_dataset::SparseDataset;
use anyhow::Result;
use candle_core::Device;
use clap::Args;
use indicatif::ProgressBar;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[arg(short, long, help = "Feature matrix X (MatrixMarket, .mtx or .mtx.gz)")]
    pub x: PathBuf,

    #[arg(short, long, help = "Label matrix Y on {-1, +1} (MatrixMarket)")]
    pub y: PathBuf,

    #[arg(short, long, default_value = "512")]
    pub batch_size: usize,

    #[arg(long, help = "Shuffle samples before cutting minibatches")]
    pub shuffle: bool,

    #[arg(long, help = "Also build CPU sparse tensors for every minibatch")]
    pub tensors: bool,
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid path: {:?}", path))
}

pub fn run(args: &SummaryArgs) -> Result<()> {
    let data = SparseDataset::from_mtx_files(path_str(&args.x)?, path_str(&args.y)?)?;

    let counts = data.task_label_counts();
    let unlabelled = counts
        .positives
        .iter()
        .zip(counts.negatives.iter())
        .filter(|&(&pos, &neg)| pos + neg == 0)
        .count();
    info!(
        "labels: {} positive, {} negative, {} of {} tasks without any label",
        counts.positives.iter().sum::<usize>(),
        counts.negatives.iter().sum::<usize>(),
        unlabelled,
        data.output_size()
    );

    let mut loader = SparseDataLoader::new(&data);
    if args.shuffle {
        loader.shuffle_minibatch(args.batch_size)?;
    } else {
        loader.sequential_minibatch(args.batch_size)?;
    }

    let nbatch = loader.num_minibatch();
    info!("{} minibatches of up to {} samples", nbatch, args.batch_size);

    let dev = Device::Cpu;
    let (mut nsamples, mut nnz_x, mut nnz_y) = (0, 0, 0);
    let pb = ProgressBar::new(nbatch as u64);

    for batch_idx in 0..nbatch {
        let batch = loader.minibatch_data(batch_idx)?;
        if args.tensors {
            data.batch_to_x(&batch, &dev)?;
            data.batch_to_y(&batch, &dev)?;
        }
        nsamples += batch.batch_size;
        nnz_x += batch.x.nnz();
        nnz_y += batch.y.nnz();
        pb.inc(1);
    }
    pb.finish_and_clear();

    if nsamples != data.len() || nnz_x != data.nnz_x() || nnz_y != data.nnz_y() {
        anyhow::bail!(
            "minibatches cover {} samples / {} features / {} labels, dataset has {} / {} / {}",
            nsamples,
            nnz_x,
            nnz_y,
            data.len(),
            data.nnz_x(),
            data.nnz_y()
        );
    }

    info!(
        "minibatches cover all {} samples, {} feature and {} label entries",
        nsamples, nnz_x, nnz_y
    );
    Ok(())
}

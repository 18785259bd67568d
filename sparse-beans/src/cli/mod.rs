pub mod summary;

use clap::{Parser, Subcommand};

pub use summary::SummaryArgs;

#[derive(Parser)]
#[command(name = "sparse-beans")]
#[command(about = "Sparse feature/label datasets for minibatch training")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load X and Y, report their shapes and walk every minibatch
    Summary(SummaryArgs),
}

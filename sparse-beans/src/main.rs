use anyhow::Result;
use clap::Parser;
use sparse_beans::cli::{summary, Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Summary(args) => {
            summary::run(args)?;
        }
    }

    Ok(())
}

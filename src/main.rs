use std::{fs::File, num::NonZeroUsize, path::PathBuf, thread};

use anyhow::Context;
use clap::Parser;
use memmap2::Mmap;
use tracing::info;
use tracing_subscriber::EnvFilter;

use monthly_mean::job;

/// Mean daily-maximum temperature of every month in a measurement file of
/// `DDMMYYYY,minTemp,maxTemp` lines.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Measurement file, one daily record per line.
    input: PathBuf,

    /// Local aggregator count; defaults to the available parallelism.
    #[arg(long)]
    workers: Option<NonZeroUsize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let workers = match args.workers {
        Some(workers) => workers,
        None => thread::available_parallelism().context("cannot size the worker pool")?,
    };

    let file = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("cannot map {}", args.input.display()))?;
    let buf = std::str::from_utf8(&mmap).context("input is not UTF-8")?;

    let means = job::run(buf, workers)?;
    info!(months = means.len(), workers = workers.get(), "job finished");
    print!("{}", means);

    Ok(())
}

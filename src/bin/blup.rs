use anyhow::{Context, Result};
use clap::Parser;
use kmkm::collection::SampleCollection;
use kmkm::stats;
use std::path::PathBuf;
use std::time::Instant;

/// Load or build a sample collection from counter records and compute its
/// normalised, covariance and correlation matrices.
#[derive(Parser)]
#[command(
    name = "kmkm-blup",
    about = "Aggregate counter records into cross-sample statistics",
    version
)]
struct Cli {
    /// Number of count-vector entries to retain per sample [integer]
    #[clap(short = 'n', long = "top-n", default_value = "1000000", help_heading = "Core")]
    top_n: usize,

    /// Number of parallel threads [integer]
    #[clap(short = 't', long = "threads", default_value = "16", help_heading = "Core")]
    threads: usize,

    /// Output basename; outputs are written as <basename>.{counts,samples,scaledcounts,covar,cor}
    #[clap(short = 'o', long = "outfile", required = true, help_heading = "Core")]
    outfile: String,

    /// Input counter record files (.kmr/.kmr.gz)
    #[clap(required = true)]
    countfiles: Vec<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    env_logger::init();
    let start_time = Instant::now();
    let opt = Cli::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()
        .context("building Rayon thread pool")?;

    log::info!("top_n: {}", opt.top_n);

    let mut samples = SampleCollection::new(opt.top_n);
    let loaded = samples
        .load(&opt.outfile, &opt.countfiles)
        .context("loading cached collection")?;

    if loaded {
        log::info!("using saved counts");
        for name in samples.names() {
            log::info!("  - {name}");
        }
    } else {
        log::info!("building collection from {} count files", opt.countfiles.len());
        samples
            .add_samples::<u8>(&opt.countfiles)
            .context("loading counter records")?;
        samples.save(&opt.outfile).context("saving collection")?;
    }

    stats::run(samples.counts(), &opt.outfile).context("computing statistics")?;

    log::info!("elapsed time: {:.2?}", start_time.elapsed());
    Ok(())
}

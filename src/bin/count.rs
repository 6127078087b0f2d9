use anyhow::{Context, Result};
use clap::Parser;
use kmkm::counter::KmerCounter;
use kmkm::io::SeqSource;
use std::path::PathBuf;
use std::time::Instant;

/// Count k-mers across one or more FASTX files into a single counter record.
#[derive(Parser)]
#[command(
    name = "kmkm-count",
    about = "Count k-mers into a counter record",
    version
)]
struct Cli {
    /// K-mer size [integer, 1..=32]
    #[clap(short = 'k', long = "ksize", default_value = "21", help_heading = "Core")]
    ksize: usize,

    /// log2 of the count vector size, i.e. M = 2^cvlog2 [integer]
    #[clap(short = 'z', long = "cvlog2", default_value = "25", help_heading = "Core")]
    cvlog2: u32,

    /// Number of counting Bloom filter tables (0 disables it) [integer]
    #[clap(short = 't', long = "cbftables", default_value = "0", help_heading = "Core")]
    cbftables: usize,

    /// Output filename for the counter record [path]
    #[clap(short = 'o', long = "outfile", required = true, help_heading = "Core")]
    outfile: PathBuf,

    /// Input FASTX files (optionally gzip-compressed)
    #[clap(required = true)]
    readfiles: Vec<PathBuf>,
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

    anyhow::ensure!(
        (1..=kmkm::kmer::MAX_K).contains(&opt.ksize),
        "ksize must be between 1 and {}",
        kmkm::kmer::MAX_K
    );

    let m = 1usize << opt.cvlog2;
    let mut counter: KmerCounter<u8> = KmerCounter::new(opt.ksize, m, true, opt.cbftables);

    let mut nread = 0usize;
    for readfile in &opt.readfiles {
        log::info!("{}", readfile.display());
        let mut source =
            SeqSource::open(readfile).with_context(|| format!("opening {readfile:?}"))?;
        nread += counter
            .consume_from(&mut source)
            .with_context(|| format!("consuming {readfile:?}"))?;
    }

    log::info!("n_reads: {nread}");
    log::info!("distinct_kmers: {}", counter.nnz());
    log::info!("total_kmers: {}", counter.counts().total());

    counter
        .save(&opt.outfile)
        .with_context(|| format!("saving {:?}", opt.outfile))?;

    log::info!("elapsed time: {:.2?}", start_time.elapsed());
    Ok(())
}

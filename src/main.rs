use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cnv_segments::mmap::MmapSegments;
use cnv_segments::parser::{ParserTolerance, SegmentParser};
use cnv_segments::{FormatConfig, SegmentCollection};

fn load(path: &Path) -> Result<SegmentCollection> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        let parser = SegmentParser::with_tolerance(ParserTolerance::Safe);
        let collection = parser
            .parse_reader(stdin.lock())
            .context("could not read segments from stdin")?;
        return Ok(collection);
    }

    let mapped = MmapSegments::open(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    mapped.parse(ParserTolerance::Safe)
}

fn run(args: &[String]) -> Result<()> {
    let path = match args.get(1) {
        Some(p) => PathBuf::from(p),
        None => anyhow::bail!(
            "usage: {} <segments.tsv|-> [phred_decimals]",
            args.first().map(String::as_str).unwrap_or("cnv-segments")
        ),
    };

    let config = match args.get(2) {
        Some(d) => FormatConfig::new(
            d.parse()
                .with_context(|| format!("invalid number of decimals: {}", d))?,
        ),
        None => FormatConfig::default(),
    };

    let collection = load(&path)?;

    info!(
        sample = collection.sample_name.as_deref().unwrap_or("."),
        segments = collection.len(),
        contigs = collection.contig_counts().len(),
        variants = collection.num_called_variants(),
        "loaded segments"
    );

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    collection.write_to(out, config)?;

    Ok(())
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<_> = std::env::args().collect();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

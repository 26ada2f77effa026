use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use wordfreq_rs::freq::{self, CountOptions, DEFAULT_OVERLAP, DEFAULT_SEGMENTS, Dispatch};

#[derive(Parser)]
#[command(
    name = "fwordfreq",
    version,
    about = "Count word frequencies in FILE by splitting it into byte ranges counted in parallel"
)]
struct Cli {
    /// File to analyze
    file: PathBuf,

    /// Number of byte ranges (concurrent workers)
    #[arg(
        short = 's',
        long = "segments",
        env = "FWORDFREQ_SEGMENTS",
        default_value_t = DEFAULT_SEGMENTS
    )]
    segments: usize,

    /// Number of most frequent words to print
    #[arg(short = 'k', long = "top", default_value_t = 10)]
    top: usize,

    /// Print every word instead of the top K
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Print a summary of each segment before the totals
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Words listed per segment in verbose mode
    #[arg(long = "segment-top", value_name = "K", default_value_t = 5)]
    segment_top: usize,

    /// Bytes read past each segment's end to finish boundary words
    #[arg(
        long = "overlap",
        value_name = "BYTES",
        env = "FWORDFREQ_OVERLAP",
        default_value_t = DEFAULT_OVERLAP
    )]
    overlap: u64,

    /// Read the file through a memory map
    #[arg(long = "mmap")]
    mmap: bool,

    /// Run segments on a shared thread pool instead of one thread each
    #[arg(long = "pool")]
    pool: bool,

    /// Emit debug logs on stderr
    #[arg(long = "debug")]
    debug: bool,
}

fn setup_logging(verbose: bool, debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            tracing_subscriber::EnvFilter::new("debug")
        } else if verbose {
            tracing_subscriber::EnvFilter::new("info")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_segments(out: &mut impl Write, result: &freq::FileCounts, k: usize) -> io::Result<()> {
    for seg in &result.segments {
        writeln!(
            out,
            "segment {} [{}, {}): {} words, {} distinct",
            seg.id,
            seg.start,
            seg.end,
            seg.total(),
            seg.counts.len()
        )?;
        let entries = freq::top(&seg.counts, k);
        for (word, count) in entries {
            writeln!(out, "  {word} {count}")?;
        }
    }
    writeln!(out)
}

fn run(cli: &Cli) -> Result<()> {
    let opts = CountOptions {
        segments: cli.segments,
        overlap: cli.overlap,
        dispatch: if cli.pool {
            Dispatch::Pool
        } else {
            Dispatch::Threads
        },
        mmap: cli.mmap,
    };

    // The message already names the I/O cause; keep it out of the chain.
    let result = freq::count_file_with(&cli.file, &opts).map_err(|e| anyhow::anyhow!("{e}"))?;

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(64 * 1024, stdout.lock());

    if cli.verbose {
        print_segments(&mut out, &result, cli.segment_top).context("write error")?;
    }

    let entries = if cli.all {
        freq::ranked(&result.totals)
    } else {
        freq::top(&result.totals, cli.top)
    };
    freq::write_ranked(&mut out, &entries).context("write error")?;
    writeln!(
        out,
        "total words: {}, distinct words: {}",
        freq::total_occurrences(&result.totals),
        result.totals.len()
    )
    .context("write error")?;
    out.flush().context("write error")?;
    Ok(())
}

fn main() {
    wordfreq_rs::common::reset_sigpipe();
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("fwordfreq: {:#}", e);
        process::exit(1);
    }
}

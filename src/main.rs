use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contig_probe::{
    filter::expected_false_positive_rate, io::read_records, report::write_reports, FilterParams,
    ProbeConfig, ProbePipeline,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "contig-probe",
    about = "Search reads for short queries and assemble the contig around each hit"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Test each query against the reads and assemble contigs for hits.
    Search {
        /// Reads file (`>id` line followed by one sequence line per record).
        reads: PathBuf,
        /// Queries file in the same format.
        queries: PathBuf,
        /// k-mer length shared by the filter and the overlap graph.
        #[arg(long, default_value_t = 21)]
        kmer_len: usize,
        /// Target false-positive rate of each context filter.
        #[arg(long, default_value_t = 0.01)]
        false_positive_rate: f64,
        /// Expected k-mers per context (sizes each context filter).
        #[arg(long, default_value_t = 16)]
        kmers_per_context: usize,
        /// First seed of the hash family.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Cap on bases appended per walk direction.
        #[arg(long)]
        max_walk_steps: Option<usize>,
        /// Reads per build shard (default ⌈√reads⌉).
        #[arg(long)]
        shard_size: Option<usize>,
        /// Reduce shards on the rayon thread pool.
        #[arg(long)]
        parallel: bool,
    },
    /// Print the optimal filter size and hash count.
    Size {
        /// Number of items to insert.
        #[arg(long)]
        items: usize,
        /// Target false-positive rate.
        #[arg(long)]
        false_positive_rate: f64,
    },
    /// Print read-length and sequence-frequency distributions.
    Stats {
        /// Reads file.
        reads: PathBuf,
        /// Number of most frequent sequences to list.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            reads,
            queries,
            kmer_len,
            false_positive_rate,
            kmers_per_context,
            seed,
            max_walk_steps,
            shard_size,
            parallel,
        } => {
            let mut config = ProbeConfig::new(kmer_len)
                .with_false_positive_rate(false_positive_rate)
                .with_kmers_per_context(kmers_per_context)
                .with_hash_seed(seed)
                .with_parallel(parallel);
            if let Some(steps) = max_walk_steps {
                config = config.with_max_walk_steps(steps);
            }
            if let Some(size) = shard_size {
                config = config.with_shard_size(size);
            }
            run_search(reads, queries, config)?
        }
        Commands::Size {
            items,
            false_positive_rate,
        } => run_size(items, false_positive_rate)?,
        Commands::Stats { reads, top } => run_stats(reads, top)?,
    }

    Ok(())
}

fn run_search(reads_path: PathBuf, queries_path: PathBuf, config: ProbeConfig) -> Result<()> {
    let reads = read_records(&reads_path)?;
    let queries = read_records(&queries_path)?;

    let pipeline =
        ProbePipeline::build(&reads, config).context("failed to build search pipeline")?;

    let reports = queries
        .iter()
        .map(|record| {
            pipeline
                .query(record.id.clone(), &record.sequence)
                .with_context(|| format!("query '{}' failed", record.id))
        })
        .collect::<Result<Vec<_>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_reports(&mut out, &reports)?;
    Ok(())
}

fn run_size(items: usize, false_positive_rate: f64) -> Result<()> {
    let params = FilterParams::for_target(items, false_positive_rate)
        .context("cannot size filter")?;
    println!("array_size\t{}", params.array_size);
    println!("hash_count\t{}", params.hash_count);
    println!(
        "expected_false_positive_rate\t{:.6}",
        expected_false_positive_rate(items, params.array_size, params.hash_count)
    );
    Ok(())
}

fn run_stats(reads_path: PathBuf, top: usize) -> Result<()> {
    let reads = read_records(&reads_path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "#reads\t{}", reads.len())?;
    writeln!(out, "#length\treads")?;
    for (length, count) in reads.length_distribution() {
        writeln!(out, "{length}\t{count}")?;
    }

    writeln!(out, "#sequence\toccurrences")?;
    for (sequence, count) in reads.frequency_distribution().into_iter().take(top) {
        writeln!(out, "{}\t{count}", String::from_utf8_lossy(&sequence))?;
    }
    Ok(())
}

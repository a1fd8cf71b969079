use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use sais_fm::index::fm::{FMIndex, IndexConfig};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "sais-fm", author, version, about = "SA-IS suffix array and FM-index exact search", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Text file to index (one trailing newline is ignored)
    text: String,
    /// Explicit alphabet order, e.g. ACGT; text symbols outside it are rejected
    #[arg(long)]
    order: Option<String>,
    /// Occ checkpoint interval in BWT rows
    #[arg(long = "sample-rate", default_value_t = 32)]
    sample_rate: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count occurrences of each pattern
    Count {
        #[command(flatten)]
        index: IndexArgs,
        /// Patterns to search for
        #[arg(required = true)]
        patterns: Vec<String>,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report the 0-based start offsets of each pattern
    Locate {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(required = true)]
        patterns: Vec<String>,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
        #[arg(long)]
        json: bool,
    },
    /// Print the suffix array (sentinel included), one entry per line
    Sa {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print the LCP array, one entry per line
    Lcp {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print the Burrows-Wheeler transform
    Bwt {
        #[command(flatten)]
        index: IndexArgs,
    },
}

#[derive(Serialize, Debug)]
struct QueryReport<'a> {
    pattern: &'a str,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    positions: Option<Vec<u32>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Count { index, patterns, threads, json } => run_query(&index, &patterns, threads, json, false),
        Commands::Locate { index, patterns, threads, json } => run_query(&index, &patterns, threads, json, true),
        Commands::Sa { index } => {
            let fm = load_index(&index)?;
            for p in fm.sa() {
                println!("{}", p);
            }
            Ok(())
        }
        Commands::Lcp { index } => {
            let fm = load_index(&index)?;
            for v in fm.lcp() {
                println!("{}", v);
            }
            Ok(())
        }
        Commands::Bwt { index } => {
            let fm = load_index(&index)?;
            println!("{}", String::from_utf8_lossy(&fm.bwt_bytes()));
            Ok(())
        }
    }
}

fn load_index(args: &IndexArgs) -> Result<FMIndex> {
    let mut text = std::fs::read(&args.text)
        .map_err(|e| anyhow::anyhow!("cannot open text file '{}': {}", args.text, e))?;
    if text.ends_with(b"\n") {
        text.pop();
        if text.ends_with(b"\r") {
            text.pop();
        }
    }

    let config = IndexConfig { occ_sample_rate: args.sample_rate };
    let order = args.order.as_deref().map(str::as_bytes);
    let fm = FMIndex::build_with_config(&text, order, &config)
        .map_err(|e| anyhow::anyhow!("cannot index '{}': {}", args.text, e))?;
    log::info!(
        "indexed '{}': {} symbols, sigma={}, occ sample rate={}",
        args.text,
        fm.text_len(),
        fm.alphabet().sigma(),
        fm.sample_rate()
    );
    Ok(fm)
}

fn run_query(args: &IndexArgs, patterns: &[String], threads: usize, json: bool, with_positions: bool) -> Result<()> {
    if threads == 0 {
        anyhow::bail!("--threads must be at least 1");
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| anyhow::anyhow!("cannot start thread pool: {}", e))?;

    let fm = load_index(args)?;
    let reports: Vec<QueryReport> = if with_positions {
        fm.locate_many(patterns)
            .into_iter()
            .zip(patterns)
            .map(|(mut hits, p)| {
                hits.sort_unstable();
                QueryReport { pattern: p, count: hits.len(), positions: Some(hits) }
            })
            .collect()
    } else {
        fm.count_many(patterns)
            .into_iter()
            .zip(patterns)
            .map(|(count, p)| QueryReport { pattern: p, count, positions: None })
            .collect()
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for r in &reports {
        match &r.positions {
            Some(hits) => {
                let joined: Vec<String> = hits.iter().map(u32::to_string).collect();
                println!("{}\t{}\t{}", r.pattern, r.count, joined.join(","));
            }
            None => println!("{}\t{}", r.pattern, r.count),
        }
    }
    Ok(())
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

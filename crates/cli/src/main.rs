//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory trace through the configured hierarchy. It performs:
//! 1. **Configuration:** Seven integer parameters describing L1, L2 and the stream buffer prefetcher.
//! 2. **Replay:** Streams the trace file (`r|w <hex address>` per line) through L1.
//! 3. **Reporting:** Prints final cache / stream buffer contents and measurements, as text or JSON.

use std::path::PathBuf;
use std::process;

use cachesim_core::Simulator;
use cachesim_core::config::Config;
use cachesim_core::sim::open_trace;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Trace-driven two-level cache hierarchy simulator",
    long_about = "Replay a memory trace through an L1 cache, an optional L2 cache and an optional stream buffer prefetcher on the last level.\n\nSet L2_SIZE or L2_ASSOC to 0 to disable L2; set PREF_N or PREF_M to 0 to disable prefetching.\n\nExamples:\n  sim 32 8192 4 262144 8 3 10 traces/gcc_trace.txt\n  sim 16 1024 2 0 0 0 0 traces/short.txt --json\n\nSet RUST_LOG=debug (or trace) for per-request logs on stderr."
)]
struct Cli {
    /// Block size in bytes (power of two).
    #[arg(value_name = "BLOCKSIZE")]
    block_size: u32,

    /// L1 size in bytes.
    #[arg(value_name = "L1_SIZE")]
    l1_size: u32,

    /// L1 associativity.
    #[arg(value_name = "L1_ASSOC")]
    l1_assoc: u32,

    /// L2 size in bytes (0 disables L2).
    #[arg(value_name = "L2_SIZE")]
    l2_size: u32,

    /// L2 associativity (0 disables L2).
    #[arg(value_name = "L2_ASSOC")]
    l2_assoc: u32,

    /// Number of stream buffers (0 disables prefetching).
    #[arg(value_name = "PREF_N")]
    pref_n: u32,

    /// Blocks per stream buffer (0 disables prefetching).
    #[arg(value_name = "PREF_M")]
    pref_m: u32,

    /// Trace file to replay.
    #[arg(value_name = "TRACE_FILE")]
    trace_file: PathBuf,

    /// Print the report as JSON instead of the text layout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Configuration described by the seven positional parameters.
    const fn config(&self) -> Config {
        Config::from_params(
            self.block_size,
            self.l1_size,
            self.l1_assoc,
            self.l2_size,
            self.l2_assoc,
            self.pref_n,
            self.pref_m,
        )
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.config();
    debug!(?config, trace = %cli.trace_file.display(), "parsed arguments");

    // Nothing reaches stdout until the configuration is valid and the trace is open.
    let mut sim = Simulator::new(config).unwrap_or_else(|e| fail(&e));
    let trace = open_trace(&cli.trace_file).unwrap_or_else(|e| fail(&e));
    if !cli.json {
        print_configuration(&cli);
    }
    if let Err(e) = sim.replay(trace) {
        fail(&e);
    }

    let report = sim.report();
    if cli.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&e),
        }
    } else {
        print!("{report}");
    }
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Echoes the simulator parameters in the reference header layout.
fn print_configuration(cli: &Cli) {
    println!("===== Simulator configuration =====");
    println!("BLOCKSIZE:  {}", cli.block_size);
    println!("L1_SIZE:    {}", cli.l1_size);
    println!("L1_ASSOC:   {}", cli.l1_assoc);
    println!("L2_SIZE:    {}", cli.l2_size);
    println!("L2_ASSOC:   {}", cli.l2_assoc);
    println!("PREF_N:     {}", cli.pref_n);
    println!("PREF_M:     {}", cli.pref_m);
    println!("trace_file: {}", cli.trace_file.display());
    println!();
}

/// Reports a fatal error on stderr and exits with status 1.
fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("Error: {err}");
    process::exit(1);
}

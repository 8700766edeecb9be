use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use noiolib::config::IndexPolicyConfig;
use noiolib::io::{load_geometry, load_trace};
use noiolib::report::Report;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Learns a cache index function from a reference trace and simulates the cache"))]
struct Args {
    /// Cache geometry, in the cache.org format or JSON
    config: String,
    /// Reference list to replay
    trace: String,
    /// Where to write the log, stdout if omitted
    output: Option<String>,

    #[arg(short, long, value_enum, default_value_t = IndexPolicyConfig::Noio)]
    index: IndexPolicyConfig,

    /// Write the report as JSON instead of the plain log
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    init_logging(args.debug);
    let geometry = load_geometry(&args.config).map_err(|e| format!("Couldn't read the config file at path {}: {e}", args.config))?;
    let trace = load_trace(&args.trace, &geometry).map_err(|e| format!("Couldn't read the trace file at path {}: {e}", args.trace))?;
    let run = Report::generate(&geometry, &trace, &args.index).map_err(|e| format!("Simulation failed: {e}"))?;
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(|e| format!("Couldn't create the output file at path {path}: {e}"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if args.json {
        serde_json::to_writer_pretty(&mut out, &run.report).map_err(|e| format!("Couldn't serialise the output {e}"))?;
        writeln!(out).map_err(|e| format!("Couldn't write the output {e}"))?;
        out.flush().map_err(|e| format!("Couldn't write the output {e}"))?;
    } else {
        run.report.write_log(&mut out).map_err(|e| format!("Couldn't write the output {e}"))?;
    }
    if args.performance {
        let end = Instant::now();
        let total_time = end - start;
        eprintln!("Simulation time: {}s", run.simulation_time.as_nanos() as f64 / 1e9);
        eprintln!("Total execution time (includes statistics, selection, parsing and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        eprintln!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        eprintln!("Parsed input configuration: {geometry:?}");
        eprintln!("Derived layout: {:?}", run.report.layout);
        eprintln!("Uninitialised cache lines: {}", run.uninitialised_lines);
    }
    Ok(())
}

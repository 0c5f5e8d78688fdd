//! mmu Binary Entry Point
//!
//! Parses the command line, installs the logger and runs the simulation,
//! writing the trace to stdout. Logging and fatal errors go to stderr.

use std::io;
use std::process;

use clap::Parser;
use frameworks_mmu_simulator::{run_file, MmuArgs, SimulationConfig};
use log::info;

fn main() {
    let args = MmuArgs::parse();

    // RUST_LOG overrides the -v level
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let config = SimulationConfig::from_args(&args);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match run_file(&args.input, config, &mut out) {
        Ok(summary) => {
            info!("{:?}", summary);
            process::exit(0);
        }
        Err(e) => {
            drop(out);
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

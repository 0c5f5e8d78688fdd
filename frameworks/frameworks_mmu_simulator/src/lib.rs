//! Frameworks Layer: MMU Simulator
//!
//! Drives a whole simulation run: reads the command file, executes every
//! command against a fresh partition and writes the trace.
//!
//! ## Modules
//!
//! - **[`args`](args/index.html)**: Command-line arguments of the `mmu` binary
//! - **[`config`](config/index.html)**: Settings of a run
//! - **[`simulation`](simulation/index.html)**: The command loop
//!
//! Depends on Entities, Use Cases and Adapters layers.

pub mod args;
pub mod config;
pub mod simulation;

pub use args::MmuArgs;
pub use config::SimulationConfig;
pub use simulation::{run, run_file, SimulationError, SimulationSummary};

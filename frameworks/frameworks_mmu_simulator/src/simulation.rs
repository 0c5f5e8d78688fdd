//! Simulation Module
//!
//! The command loop. Each command is announced, executed against the
//! partition, and followed by a snapshot of both lists. Allocation errors
//! are printed into the trace and the run continues; anything else stops it.

use std::io::{self, Write};
use std::path::Path;

use adapters_io_operations::{
    read_command_script, write_command_banner, write_error, write_snapshot, CommandScript,
    ReadError,
};
use log::{debug, info};
use usecases_memory_management::{AllocationError, Command, Partition, PartitionError, PartitionViolation};

use crate::config::SimulationConfig;

/// Fatal simulation errors
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// Conservation check failed after the command at `index`
    #[error("after command {index} ({command}): {violation}")]
    Violation {
        index: usize,
        command: Command,
        #[source]
        violation: PartitionViolation,
    },
    #[error("unable to write trace: {0}")]
    Output(#[from] io::Error),
}

impl SimulationError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SimulationError::Violation { .. } => 2,
            _ => 1,
        }
    }
}

/// Counters of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub commands: usize,
    pub failed_allocations: usize,
    pub failed_deallocations: usize,
    pub free_blocks: usize,
    pub allocated_blocks: usize,
}

/// Run `script` and write its trace to `out`
///
/// # Errors
///
/// Returns `SimulationError::Partition` for an empty partition,
/// `SimulationError::Violation` when verification is on and a command
/// breaks conservation, and `SimulationError::Output` if `out` fails.
pub fn run(
    script: &CommandScript,
    config: SimulationConfig,
    out: &mut impl Write,
) -> Result<SimulationSummary, SimulationError> {
    let mut partition = Partition::new(script.partition_size(), config.policy)?;
    let mut summary = SimulationSummary::default();
    info!(
        "simulating {} commands on {} units with {}",
        script.commands().len(),
        partition.size(),
        config.policy
    );

    for (index, command) in script.commands().iter().enumerate() {
        write_command_banner(out, command)?;
        match partition.execute(command) {
            Ok(()) => debug!("{}: ok", command),
            Err(err) => {
                debug!("{}: {}", command, err);
                match err {
                    AllocationError::AllocationFailed { .. } => summary.failed_allocations += 1,
                    AllocationError::NotFound { .. } => summary.failed_deallocations += 1,
                }
                write_error(out, &err)?;
            }
        }
        write_snapshot(out, partition.free_list(), partition.allocated_list())?;
        summary.commands += 1;

        if config.verify_invariants {
            partition
                .verify()
                .map_err(|violation| SimulationError::Violation {
                    index,
                    command: *command,
                    violation,
                })?;
        }
    }
    out.flush()?;

    summary.free_blocks = partition.free_list().len();
    summary.allocated_blocks = partition.allocated_list().len();
    info!(
        "finished: {} commands, {} failed allocations, {} failed deallocations",
        summary.commands, summary.failed_allocations, summary.failed_deallocations
    );
    Ok(summary)
}

/// Read the command file at `path` and run it
///
/// # Errors
///
/// Returns `SimulationError::Read` if the file cannot be loaded, otherwise
/// the errors of `run`.
pub fn run_file(
    path: impl AsRef<Path>,
    config: SimulationConfig,
    out: &mut impl Write,
) -> Result<SimulationSummary, SimulationError> {
    let script = read_command_script(path)?;
    run(&script, config, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters_io_operations::parse_command_script;
    use usecases_memory_management::AllocationPolicy;

    fn run_text(input: &str, policy: AllocationPolicy) -> (SimulationSummary, String) {
        let script = parse_command_script(input).unwrap();
        let mut out = Vec::new();
        let config = SimulationConfig::new(policy).with_verification(true);
        let summary = run(&script, config, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_summary_counts_failures() {
        let (summary, trace) = run_text("10 1 6 2 6 -3 0 -1 0", AllocationPolicy::FirstFit);
        assert_eq!(summary.commands, 4);
        assert_eq!(summary.failed_allocations, 1);
        assert_eq!(summary.failed_deallocations, 1);
        assert_eq!(summary.free_blocks, 2);
        assert_eq!(summary.allocated_blocks, 0);
        assert!(trace.contains("Error: Memory Allocation 6 blocks\n"));
        assert!(trace.contains("Error: Can't locate Memory Used by PID: 3\n"));
    }

    #[test]
    fn test_no_commands_writes_nothing() {
        let (summary, trace) = run_text("10", AllocationPolicy::BestFit);
        assert_eq!(summary.commands, 0);
        assert_eq!(summary.free_blocks, 1);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_coalesce_after_full_release() {
        let (summary, trace) = run_text("30 1 10 2 10 3 10 -2 0 -1 0 -3 0 -99999 0", AllocationPolicy::WorstFit);
        assert_eq!(summary.free_blocks, 1);
        assert!(trace.ends_with(
            "COALESCE/COMPACT\n************************\nFree Memory:\nBlock 0:\t START: 0\t END: 29\n\nAllocated Memory:\n\n\n"
        ));
    }

    #[test]
    fn test_exit_codes() {
        let violation = SimulationError::Violation {
            index: 0,
            command: Command::Coalesce,
            violation: PartitionViolation::Gap { start: 0, end: 1 },
        };
        assert_eq!(violation.exit_code(), 2);
        assert_eq!(SimulationError::Partition(PartitionError::EmptyPartition).exit_code(), 1);
    }
}

//! Simulation Configuration Module
//!
//! Settings of one run, built from the parsed command line. The partition
//! size is not part of it; it comes from the command file.

use usecases_memory_management::AllocationPolicy;

use crate::args::MmuArgs;

/// Settings passed to the command loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub policy: AllocationPolicy,
    /// Check partition conservation after every command
    pub verify_invariants: bool,
}

impl SimulationConfig {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self {
            policy,
            verify_invariants: false,
        }
    }

    pub fn with_verification(mut self, verify_invariants: bool) -> Self {
        self.verify_invariants = verify_invariants;
        self
    }

    pub fn from_args(args: &MmuArgs) -> Self {
        Self::new(args.policy()).with_verification(args.verify)
    }
}

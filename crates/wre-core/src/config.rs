//! WRE Configuration
//!
//! Defines store capacities and build-shape knobs for the Word Runtime Engine.
//! Configuration specifies constraints only; enforcement is handled by the VM.

use crate::capability::CapabilitySet;

/// Direction in which the call stack grows through memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackGrowth {
    /// SP starts at 0 and pushes increment it
    #[default]
    Upward,
    /// SP starts at `memory_size - 1` and pushes decrement it
    Downward,
}

/// VM Configuration
#[derive(Debug, Clone)]
pub struct WreConfig {
    /// Number of registers in the register file
    pub register_count: usize,

    /// Number of words in the memory array
    pub memory_size: usize,

    /// Stack growth direction and initial SP
    pub stack_growth: StackGrowth,

    /// Intrinsic capabilities available to the program
    pub capabilities: CapabilitySet,

    /// Abort after this many dispatched blocks (None = unbounded)
    pub max_steps: Option<u64>,
}

impl Default for WreConfig {
    fn default() -> Self {
        WreConfig {
            register_count: 10_000,
            memory_size: 10_000,
            stack_growth: StackGrowth::Upward,
            capabilities: CapabilitySet::all(),
            max_steps: None,
        }
    }
}

impl WreConfig {
    /// Create a new configuration with default capacities and every capability
    pub fn new() -> Self {
        Self::default()
    }

    /// Small 100/100 store with output-only intrinsics
    pub fn compact() -> Self {
        WreConfig {
            register_count: 100,
            memory_size: 100,
            capabilities: CapabilitySet::output_only(),
            ..Self::default()
        }
    }

    pub fn with_stack_growth(mut self, growth: StackGrowth) -> Self {
        self.stack_growth = growth;
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }
}

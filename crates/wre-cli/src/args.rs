use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wre")]
#[command(about = "Word Runtime Engine", long_about = None)]
pub struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a program image against stdin/stdout
    Run {
        /// Path to the program image
        path: String,
        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Write a sample program image
    Generate {
        /// Output path
        path: String,
    },
    /// Print the blocks of a program image
    Inspect {
        /// Path to the program image
        path: String,
    },
}

#[derive(Args)]
pub struct MachineArgs {
    /// Memory cells
    #[arg(long, default_value_t = 10_000)]
    pub memory: usize,
    /// Registers
    #[arg(long, default_value_t = 10_000)]
    pub registers: usize,
    /// Grow the stack downward from the top of memory
    #[arg(long)]
    pub grow_down: bool,
    /// Withhold the strings capability
    #[arg(long)]
    pub no_strings: bool,
    /// Withhold the floats capability
    #[arg(long)]
    pub no_floats: bool,
    /// Withhold the input capability
    #[arg(long)]
    pub no_input: bool,
    /// Abort after this many dispatched blocks
    #[arg(long)]
    pub max_steps: Option<u64>,
}

use std::fs;
use std::io;

use anyhow::{Context, Result};
use tracing::warn;

use wre_core::{Capability, CapabilitySet, ImageLoader, Machine, StackGrowth, StreamConsole, WreConfig};

use crate::args::MachineArgs;

pub fn run_file(path: &str, args: &MachineArgs) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {path}"))?;
    let loaded = ImageLoader::load(&bytes).context("invalid program image")?;

    let config = config_from(args);
    for capability in Capability::ALL {
        if loaded.required.contains(capability) && !config.capabilities.contains(capability) {
            warn!(%capability, "image needs a capability that is withheld");
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = StreamConsole::new(stdin.lock(), stdout.lock());

    let mut vm = Machine::new(config, loaded.program, console).context("failed to build machine")?;
    vm.run().context("runtime error")?;
    Ok(())
}

fn config_from(args: &MachineArgs) -> WreConfig {
    let mut capabilities = CapabilitySet::all();
    if args.no_strings {
        capabilities.revoke(Capability::Strings);
    }
    if args.no_floats {
        capabilities.revoke(Capability::Floats);
    }
    if args.no_input {
        capabilities.revoke(Capability::Input);
    }

    let growth = if args.grow_down { StackGrowth::Downward } else { StackGrowth::Upward };

    WreConfig {
        register_count: args.registers,
        memory_size: args.memory,
        max_steps: args.max_steps,
        ..WreConfig::new()
    }
    .with_stack_growth(growth)
    .with_capabilities(capabilities)
}

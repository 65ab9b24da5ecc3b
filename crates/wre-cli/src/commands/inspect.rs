use std::fs;

use anyhow::{Context, Result};

use wre_core::{ImageLoader, Label};

pub fn inspect_file(path: &str) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {path}"))?;
    let loaded = ImageLoader::load(&bytes).context("invalid program image")?;
    let program = &loaded.program;

    println!("== {} ==", path);
    println!("entry {}, {} data cells, capabilities 0x{:02X}", program.entry(), program.data().len(), loaded.required.bits());
    for (i, block) in program.blocks().iter().enumerate() {
        println!("{}:", Label(i as u32));
        for op in &block.ops {
            println!("    {:?}", op);
        }
        println!("    -> {:?}", block.transfer);
    }
    Ok(())
}

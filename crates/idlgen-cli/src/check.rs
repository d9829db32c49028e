//! `idlgen check`: validate a program without writing anything

use crate::generate::{base_name, load_program};
use anyhow::{Context, Result};
use idlgen_codegen::Generator;
use std::path::Path;

/// Run the check command
pub fn run(input: &Path) -> Result<()> {
    let program = load_program(input)?;
    let base = base_name(input)?;

    let stats = Generator::default()
        .build_units(&program, &base)
        .with_context(|| format!("Invalid program: {}", input.display()))?
        .stats;

    println!("✓ {} is valid", input.display());
    println!("  Definitions: {}", program.definitions().len());
    println!("  Types: {}", stats.types);
    println!("  Codecs: {}", stats.codecs);
    println!("  Services: {} ({} functions)", stats.services, stats.functions);

    Ok(())
}

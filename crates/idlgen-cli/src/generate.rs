//! `idlgen generate`: program in, three units out

use anyhow::{Context, Result};
use idlgen_codegen::{GeneratedUnits, Generator, GeneratorConfig};
use idlgen_schema::Program;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions stripped from the input file name to derive the base name
const SCHEMA_EXTENSIONS: &[&str] = &[".json", ".thrift"];

/// Run the generate command
pub fn run(
    input: &Path,
    output: &Path,
    base: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let base = match base {
        Some(base) => base,
        None => base_name(input)?,
    };
    let config = load_config(config.as_deref())?;
    let program = load_program(input)?;

    println!("Generating {} from {}", base, input.display());

    let units = Generator::new(config)
        .generate(&program, &base)
        .with_context(|| format!("Failed to generate code for {}", input.display()))?;

    let written = write_units(&units, output)?;
    for path in &written {
        println!("  {}", path.display());
    }

    println!(
        "\n✓ Generated {} types, {} codecs, {} services ({} functions)",
        units.stats.types, units.stats.codecs, units.stats.services, units.stats.functions
    );

    Ok(())
}

/// Load a parsed program from the front-end's JSON document
pub fn load_program(input: &Path) -> Result<Program> {
    Program::from_file(input).with_context(|| format!("Failed to load program: {:?}", input))
}

/// Load generator settings; no path means the defaults
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {:?}", path))?;

    GeneratorConfig::from_toml(&content).with_context(|| format!("Failed to parse config: {:?}", path))
}

/// Derive the unit base name from the input file name.
///
/// `calc.thrift.json` and `calc.json` both give `calc`.
pub fn base_name(input: &Path) -> Result<String> {
    let mut name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Input path has no usable file name: {:?}", input))?;

    for ext in SCHEMA_EXTENSIONS {
        name = name.strip_suffix(ext).unwrap_or(name);
    }

    if name.is_empty() {
        anyhow::bail!("Cannot derive a base name from {:?}; pass --base", input);
    }

    Ok(name.to_string())
}

/// Write every unit into `output`, creating it if needed
pub fn write_units(units: &GeneratedUnits, output: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;

    let mut written = Vec::with_capacity(3);
    for unit in units.units() {
        let path = output.join(&unit.file_name);
        fs::write(&path, &unit.source)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!(unit = %unit.guard, path = %path.display(), "wrote unit");
        written.push(path);
    }

    Ok(written)
}

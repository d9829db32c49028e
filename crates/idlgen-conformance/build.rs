use idlgen_codegen::{Generator, GeneratorConfig};
use idlgen_schema::Program;
use std::error::Error;
use std::path::PathBuf;
use std::{env, fs};

fn main() -> Result<(), Box<dyn Error>> {
    let fixture = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join("fixtures/calc.json");
    println!("cargo:rerun-if-changed={}", fixture.display());

    let program = Program::from_file(&fixture)?;
    let units = Generator::new(GeneratorConfig::default()).generate(&program, "calc")?;

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    for unit in units.units() {
        fs::write(out_dir.join(&unit.file_name), &unit.source)?;
    }
    Ok(())
}

//! Generates bindings for `schema/` into `$OUT_DIR/vk.rs`.

use std::error::Error;
use std::path::PathBuf;

use vk_bindgen::{Bundle, GenerateSettings, SchemaSet, generate};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=schema");
    let manifest_dir: PathBuf = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir: PathBuf = PathBuf::from(std::env::var("OUT_DIR")?);

    let schemas: SchemaSet = SchemaSet::from_dir(manifest_dir.join("schema"))?;
    let bundle: Bundle = generate(&schemas, &GenerateSettings::default())?;
    std::fs::write(out_dir.join("vk.rs"), bundle.inline_source()?)?;
    Ok(())
}

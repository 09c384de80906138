//! Generates the library client into `OUT_DIR`.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use arbor_definitions::define_library_model;
use arbor_gen::output::render_client_items;
use arbor_gen::plan::compile;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let model = define_library_model();
    model.validate()?;
    let plan = compile(&model)?;
    let code = render_client_items(&plan)?;

    let out = PathBuf::from(env::var("OUT_DIR")?).join("library.rs");
    fs::write(out, code)?;
    Ok(())
}

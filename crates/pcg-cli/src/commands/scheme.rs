use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use pcg_core::to_canonical_json_bytes;
use pcg_scheme::synthesize;

use super::load_model;

#[derive(Args, Debug)]
pub struct SchemeArgs {
    /// YAML topology description.
    #[arg(long)]
    pub topology: PathBuf,
}

pub fn run(args: &SchemeArgs) -> Result<(), Box<dyn Error>> {
    let model = load_model(&args.topology)?;
    let scheme = synthesize(&model);
    let json = to_canonical_json_bytes(&scheme)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

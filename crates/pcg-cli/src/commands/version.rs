use std::error::Error;
use std::process::Command;

use clap::Args;
use pcg_core::to_canonical_json_bytes;
use pcg_fmt::RenderOptions;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including git, toolchain and printer defaults.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    git_commit: String,
    rustc: String,
    render_defaults: RenderOptions,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        git_commit: first_line_of("git", &["rev-parse", "HEAD"])
            .unwrap_or_else(|| "unknown".into()),
        rustc: first_line_of("rustc", &["--version"])
            .unwrap_or_else(|| "rustc unavailable".into()),
        render_defaults: RenderOptions::default(),
    };
    let json = to_canonical_json_bytes(&info)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

fn first_line_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

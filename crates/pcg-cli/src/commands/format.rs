use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use pcg_core::PcgError;
use pcg_fmt::{parse_document, PrettyPrinter, RenderOptions};
use tracing::{info, warn};

use super::{io_error, with_path, write_file};

/// Exit status when at least one file was rewritten.
const EXIT_MODIFIED: u8 = 2;

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Configuration files to re-canonicalize in place.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Widest single-line tag, indentation included.
    #[arg(long, default_value_t = 100)]
    pub max_width: usize,
}

/// Re-renders every file; a failing file does not stop the others.
pub fn run(args: &FormatArgs) -> Result<ExitCode, Box<dyn Error>> {
    let printer = PrettyPrinter::new(RenderOptions::default().with_max_width(args.max_width))?;
    let mut failed = 0usize;
    let mut modified = 0usize;

    for path in &args.files {
        match format_file(&printer, path) {
            Ok(true) => {
                println!("Reformatted {}", path.display());
                modified += 1;
            }
            Ok(false) => {}
            Err(err) => {
                warn!(path = %path.display(), code = err.code(), "file not formatted");
                eprintln!("Error: {err}");
                failed += 1;
            }
        }
    }

    info!(files = args.files.len(), modified, failed, "format finished");
    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else if modified > 0 {
        ExitCode::from(EXIT_MODIFIED)
    } else {
        ExitCode::SUCCESS
    })
}

/// Returns whether the file had to be rewritten.
fn format_file(printer: &PrettyPrinter, path: &Path) -> Result<bool, PcgError> {
    let text = fs::read_to_string(path).map_err(|err| io_error("read-config", path, &err))?;
    let document = parse_document(&text).map_err(|err| with_path(err, "config", path))?;
    let formatted = printer.render(&document);
    if formatted == text {
        return Ok(false);
    }
    write_file(path, formatted.as_bytes())?;
    Ok(true)
}

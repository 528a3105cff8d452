use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use pcg_core::{
    stable_hash_bytes, stable_hash_string, to_canonical_json_bytes, ErrorInfo, PcgError,
};
use pcg_fmt::{PrettyPrinter, RenderOptions};
use pcg_scheme::{synthesize, SynthesisWarning};
use serde::Serialize;
use tracing::info;

use super::{load_model, write_file};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// YAML topology description.
    #[arg(long)]
    pub topology: PathBuf,
    /// Output file for the document; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// JSON report with document digest and synthesis warnings.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Widest single-line tag, indentation included.
    #[arg(long, default_value_t = 100)]
    pub max_width: usize,
    /// Fail instead of writing output when synthesis records warnings.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct GenerateReport<'a> {
    topology: String,
    scheme: &'static str,
    participants: usize,
    exchanges: usize,
    document_digest: String,
    scheme_digest: String,
    warnings: &'a [SynthesisWarning],
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let printer = PrettyPrinter::new(RenderOptions::default().with_max_width(args.max_width))?;
    let model = load_model(&args.topology)?;
    let scheme = synthesize(&model);
    if args.strict && !scheme.warnings.is_empty() {
        return Err(PcgError::Synthesis(
            ErrorInfo::new("synthesis-warnings", "synthesis recorded warnings")
                .with_context("count", scheme.warnings.len().to_string())
                .with_context("first", scheme.warnings[0].to_string())
                .with_hint("drop --strict to accept placeholder output"),
        )
        .into());
    }

    let document = pcg_doc::build(&model, &scheme);
    let text = printer.render(&document);
    let digest = stable_hash_bytes(text.as_bytes());

    match &args.out {
        Some(path) => write_file(path, text.as_bytes())?,
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }

    if let Some(path) = &args.report {
        let report = GenerateReport {
            topology: args.topology.display().to_string(),
            scheme: scheme.tag(),
            participants: model.participants().len(),
            exchanges: scheme.exchanges.len(),
            document_digest: digest.clone(),
            scheme_digest: stable_hash_string(&scheme)?,
            warnings: &scheme.warnings,
        };
        write_file(path, &to_canonical_json_bytes(&report)?)?;
    }

    info!(
        scheme = scheme.tag(),
        warnings = scheme.warnings.len(),
        digest = %digest,
        "configuration generated"
    );
    Ok(())
}

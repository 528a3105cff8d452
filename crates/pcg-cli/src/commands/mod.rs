use std::fs;
use std::path::Path;

use pcg_core::{ErrorInfo, PcgError};
use pcg_topo::{build, TopologyInput, TopologyModel};

pub mod format;
pub mod generate;
pub mod scheme;
pub mod version;

/// Reads, parses and builds the topology model at `path`.
pub(crate) fn load_model(path: &Path) -> Result<TopologyModel, PcgError> {
    let text = fs::read_to_string(path).map_err(|err| io_error("read-topology", path, &err))?;
    let input = TopologyInput::from_yaml(&text).map_err(|err| with_path(err, "topology", path))?;
    build(&input).map_err(|err| with_path(err, "topology", path))
}

pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PcgError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| io_error("create-directory", parent, &err))?;
    }
    fs::write(path, bytes).map_err(|err| io_error("write-output", path, &err))
}

pub(crate) fn io_error(code: &str, path: &Path, err: &std::io::Error) -> PcgError {
    PcgError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Adds the offending file under `key` to model and parse errors.
pub(crate) fn with_path(err: PcgError, key: &str, path: &Path) -> PcgError {
    let path = path.display().to_string();
    match err {
        PcgError::Model(info) => PcgError::Model(info.with_context(key, path)),
        PcgError::Serde(info) => PcgError::Serde(info.with_context(key, path)),
        other => other,
    }
}

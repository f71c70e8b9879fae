use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cli::validate_label;
use crate::error::{SynthError, SynthResult};
use crate::results::{SnapshotReport, SweepReport};

pub fn report_dir(output_dir: &Path, label: &str) -> SynthResult<PathBuf> {
    validate_label(label)?;
    Ok(output_dir.join(label))
}

/// Writes `value` as pretty JSON to `<output_dir>/<label>/<name>.json`.
pub fn write_report<T: Serialize>(
    output_dir: &Path,
    label: &str,
    name: &str,
    value: &T,
) -> SynthResult<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) || matches!(name, "." | "..") {
        return Err(SynthError::InvalidArgument(format!(
            "report name '{name}' is not a plain file name"
        )));
    }
    let dir = report_dir(output_dir, label)?;
    fs::create_dir_all(&dir)?;
    let file = dir.join(format!("{name}.json"));
    fs::write(&file, serde_json::to_vec_pretty(value)?)?;
    info!(path = %file.display(), "wrote report");
    Ok(file)
}

pub fn read_snapshot_report(path: impl AsRef<Path>) -> SynthResult<SnapshotReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn read_sweep_report(path: impl AsRef<Path>) -> SynthResult<SweepReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

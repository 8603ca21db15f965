use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::path::Path;

use crate::case::ExitReport;

/// Save a report as pretty JSON, atomically
///
/// Uses atomic-write-file so a reader never sees a half-written report.
/// The parent directory must already exist.
pub fn save_report(path: &Path, report: &ExitReport) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}

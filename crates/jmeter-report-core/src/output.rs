//! Report file output
//!
//! The document is written to a temporary file in the destination directory
//! and renamed into place, so an aborted run never leaves a partial report.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ReportError, Result};

/// Permissions of a written report on Unix
#[cfg(unix)]
const REPORT_MODE: u32 = 0o644;

/// Write `contents` to `output_dir/file_name`, creating the directory if needed.
///
/// An existing file of the same name is replaced.
pub fn write_atomic(output_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| ReportError::io(output_dir, e))?;

    let target = output_dir.join(file_name);
    let mut staged =
        NamedTempFile::new_in(output_dir).map_err(|e| ReportError::io(output_dir, e))?;
    // tempfile creates 0600; the report gets ordinary file permissions
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(REPORT_MODE))
            .map_err(|e| ReportError::io(staged.path(), e))?;
    }

    let staged_path = staged.path().to_path_buf();
    debug!("Staging report at {}", staged_path.display());
    staged
        .write_all(contents.as_bytes())
        .and_then(|_| staged.flush())
        .map_err(|e| ReportError::io(&staged_path, e))?;
    staged
        .persist(&target)
        .map_err(|e| ReportError::io(&target, e.error))?;

    info!("Wrote {} bytes to {}", contents.len(), target.display());
    Ok(target)
}

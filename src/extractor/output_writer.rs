use crate::error::{ExtractError, Result};
use crate::table::Table;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Writes a table to its final path through a temporary sibling file, so
/// the destination is either replaced whole or left untouched.
pub struct OutputWriter {
    output_path: PathBuf,
    delimiter: u8,
}

impl OutputWriter {
    pub fn new<P: Into<PathBuf>>(output_path: P, delimiter: u8) -> Self {
        Self {
            output_path: output_path.into(),
            delimiter,
        }
    }

    /// Returns the number of data rows written (the header excluded).
    pub fn write(&self, table: &Table, progress_callback: Option<&dyn Fn(u64)>) -> Result<u64> {
        // An existing output is replaced at its real location, so a
        // symlinked output keeps its link and the target gets the data.
        let target = self.resolve_target();
        let mut temp_file = create_temp_in(output_directory(&target))
            .map_err(|e| self.write_error(e))?;

        let written = table
            .write_to(&mut temp_file, self.delimiter, progress_callback)
            .map_err(|e| self.write_error(e.into()))?;

        if let Ok(metadata) = fs::metadata(&target) {
            temp_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| self.write_error(e))?;
        }

        temp_file
            .persist(&target)
            .map_err(|e| self.write_error(e.error))?;

        Ok(written)
    }

    fn resolve_target(&self) -> PathBuf {
        if fs::symlink_metadata(&self.output_path).is_ok() {
            if let Ok(resolved) = fs::canonicalize(&self.output_path) {
                return resolved;
            }
        }
        self.output_path.clone()
    }

    fn write_error(&self, source: io::Error) -> ExtractError {
        ExtractError::Write {
            path: self.output_path.display().to_string(),
            source,
        }
    }
}

fn output_directory(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

// New outputs get the same mode `File::create` would give them (0o666
// less the umask) instead of the owner-only temp file default.
fn create_temp_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".country-extract");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

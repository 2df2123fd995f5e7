//! Atomic file writes for exports.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use uuid::Uuid;

use crate::error::{AuraError, Result};

/// Write `data` to `path` via a sibling temp file and a rename.
///
/// Readers see either the old file or the complete new one, never a
/// partial write. Parent directories are created as needed.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AuraError::InvalidInput(format!("Invalid file name: {}", path.display())))?;
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, Uuid::new_v4().simple()));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;
    let written = file.write_all(data).and_then(|_| file.sync_all());
    drop(file);
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    rename_with_fallback(&temp_path, path)?;
    Ok(())
}

/// `fs::rename`, retried after removing the destination on platforms where
/// rename refuses to replace an existing file. The temp file is removed if
/// both attempts fail.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

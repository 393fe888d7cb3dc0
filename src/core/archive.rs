//! Archive packaging
//!
//! Walks the staging tree and writes one Deflate-compressed ZIP archive
//! preserving the relative directory structure: one folder per objection and
//! the summary document at the archive root. Runs only after the orchestrator
//! has confirmed every render and retrieval reached a terminal outcome.

use crate::domain::{ExportError, Result};
use std::fs::File;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Packs the staging tree into a single archive at `archive_path`
///
/// Blocking; the orchestrator runs it on the blocking pool.
///
/// # Errors
///
/// Returns `PackagingFailed` on any filesystem or writer error. The caller
/// removes a partially written archive.
pub fn pack(staging_root: &Path, archive_path: &Path) -> Result<()> {
    let failed = |reason: String| ExportError::PackagingFailed(reason);

    let file = File::create(archive_path)
        .map_err(|e| failed(format!("creating {}: {e}", archive_path.display())))?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    add_dir_recursively(&mut writer, staging_root, staging_root, options)?;

    writer
        .finish()
        .map_err(|e| failed(format!("finalizing archive: {e}")))?;
    Ok(())
}

fn add_dir_recursively(
    writer: &mut ZipWriter<File>,
    base: &Path,
    dir: &Path,
    options: FileOptions,
) -> Result<()> {
    let failed = |reason: String| ExportError::PackagingFailed(reason);

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| failed(format!("reading {}: {e}", dir.display())))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| failed(format!("reading {}: {e}", dir.display())))?;
    // Deterministic archive entry order regardless of directory iteration.
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = path
            .strip_prefix(base)
            .map_err(|e| failed(format!("relativizing {}: {e}", path.display())))?
            .to_string_lossy()
            .into_owned();

        if path.is_dir() {
            writer
                .add_directory(&name, options)
                .map_err(|e| failed(format!("adding directory {name}: {e}")))?;
            add_dir_recursively(writer, base, &path, options)?;
        } else {
            writer
                .start_file(&name, options)
                .map_err(|e| failed(format!("adding file {name}: {e}")))?;
            let mut source = File::open(&path)
                .map_err(|e| failed(format!("opening {}: {e}", path.display())))?;
            std::io::copy(&mut source, writer)
                .map_err(|e| failed(format!("writing {name}: {e}")))?;
        }
    }

    Ok(())
}

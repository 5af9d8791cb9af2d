use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Compresses `base_dir` (a directory under `root`) into
/// `<root>/<archive_name>.zip`.
///
/// Entries keep the `base_dir/` prefix, so unpacking the archive
/// recreates the directory instead of spilling its contents.
///
/// # Errors
///
/// Returns an error if the source directory is missing or the archive
/// cannot be written.
pub fn make_zip_archive(root: &Path, base_dir: &str, archive_name: &str) -> Result<PathBuf> {
    let source = root.join(base_dir);
    if !source.is_dir() {
        bail!("Cannot archive missing directory: {}", source.display());
    }

    let archive_path = root.join(format!("{archive_name}.zip"));
    debug!("archiving {} into {}", source.display(), archive_path.display());

    let file = File::create(&archive_path)
        .with_context(|| format!("Failed to create {}", archive_path.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(&source) {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry.path().strip_prefix(root).with_context(|| {
            format!("Entry escaped the archive root: {}", entry.path().display())
        })?;
        let name = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            writer
                .add_directory(name.as_str(), options)
                .with_context(|| format!("Failed to add directory {name}"))?;
        } else if entry.file_type().is_file() {
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to add {name}"))?;
            let mut reader = File::open(entry.path())
                .with_context(|| format!("Failed to open {}", entry.path().display()))?;
            io::copy(&mut reader, &mut writer)
                .with_context(|| format!("Failed to compress {name}"))?;
        }
    }

    writer.finish().context("Failed to finalize the archive")?;
    Ok(archive_path)
}

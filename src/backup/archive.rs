// tabletranslator/src/backup/archive.rs
use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Gzips `source_file` to `<source_file>.gz` and removes the uncompressed file.
///
/// # Returns
/// Path to the created `.gz` file.
pub fn gzip_file(source_file: &Path) -> Result<PathBuf> {
    if !source_file.is_file() {
        return Err(anyhow::anyhow!(
            "Source for compression is not a file: {}",
            source_file.display()
        ));
    }

    let mut archive_name = source_file.as_os_str().to_owned();
    archive_name.push(".gz");
    let archive_path = PathBuf::from(archive_name);

    let mut input = File::open(source_file)
        .with_context(|| format!("Failed to open dump file: {}", source_file.display()))?;
    let archive_file = File::create(&archive_path)
        .with_context(|| format!("Failed to create archive file: {}", archive_path.display()))?;

    let mut encoder = GzEncoder::new(archive_file, Compression::default());
    io::copy(&mut input, &mut encoder).with_context(|| {
        format!(
            "Failed to compress {} into {}",
            source_file.display(),
            archive_path.display()
        )
    })?;
    encoder.finish().with_context(|| {
        format!(
            "Failed to finish Gzip encoding for archive: {}",
            archive_path.display()
        )
    })?;

    fs::remove_file(source_file).with_context(|| {
        format!("Failed to remove uncompressed dump: {}", source_file.display())
    })?;

    info!("✓ Compressed dump to {}", archive_path.display());
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_gzip_file_replaces_plain_dump() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let dump = dir.path().join("unit_translation_20240912_103000.sql");
        fs::write(&dump, "INSERT INTO `unit_translation` VALUES ('Stück');\n")?;

        let archive = gzip_file(&dump)?;

        assert_eq!(archive, dir.path().join("unit_translation_20240912_103000.sql.gz"));
        assert!(!dump.exists());
        let mut content = String::new();
        GzDecoder::new(File::open(&archive)?).read_to_string(&mut content)?;
        assert!(content.contains("Stück"));
        Ok(())
    }

    #[test]
    fn test_gzip_missing_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(gzip_file(&dir.path().join("missing.sql")).is_err());
    }
}

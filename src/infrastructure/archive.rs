//! Zip package extraction

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::infrastructure::traits::ArchiveExtractor;

/// `ArchiveExtractor` for zip packages.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> io::Result<Vec<PathBuf>> {
        debug!("extract: {} -> {}", archive.display(), dest.display());
        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(file).map_err(zip_err)?;

        let mut written = Vec::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(zip_err)?;
            // Entries for directories are optional; parents are created per file
            if entry.is_dir() {
                continue;
            }
            let relative = entry.enclosed_name().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unsafe entry path in archive: {}", entry.name()),
                )
            })?;

            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            debug!("Writing {}", target.display());
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
            written.push(target);
        }

        Ok(written)
    }
}

fn zip_err(e: zip::result::ZipError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

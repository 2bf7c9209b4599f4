use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

pub mod config_io;
pub mod image_io;
pub mod journal_io;
pub mod lock;
pub mod paths;
pub mod profile_io;

/// Write `content` to `path` atomically using a temp file + rename.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Set a corrupt document aside as `<path>.bak` so the next save cannot
/// silently destroy it. Best-effort: failures are logged.
pub(crate) fn set_aside_corrupt(path: &Path, cause: &dyn std::fmt::Display) {
    let bak = path.with_extension("json.bak");
    match std::fs::copy(path, &bak) {
        Ok(_) => log::warn!(
            "could not decode {} ({}); backed up as {}",
            path.display(),
            cause,
            bak.display()
        ),
        Err(e) => log::warn!(
            "could not decode {} ({}); backup to {} also failed: {}",
            path.display(),
            cause,
            bak.display(),
            e
        ),
    }
}

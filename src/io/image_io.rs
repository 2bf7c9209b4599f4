use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use crate::io::paths::DataDir;

/// Error type for image store operations
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("not an image filename: {0}")]
    InvalidFilename(String),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Flat directory of uniquely named image files, referenced by filename
/// from entry records and the profile.
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: &DataDir) -> Self {
        ImageStore {
            dir: dir.images_dir(),
        }
    }

    /// Store image bytes under a freshly generated name, returning the
    /// filename to record on the owning entry.
    pub fn save_bytes(&self, bytes: &[u8], extension: &str) -> Result<String, ImageError> {
        let filename = format!("{}.{}", Uuid::new_v4(), normalize_extension(extension));
        let path = self.dir.join(&filename);
        fs::create_dir_all(&self.dir).map_err(|e| ImageError::WriteError {
            path: self.dir.clone(),
            source: e,
        })?;
        fs::write(&path, bytes).map_err(|e| ImageError::WriteError { path, source: e })?;
        Ok(filename)
    }

    /// Read image bytes back. Missing or unreadable files are treated as
    /// "no image" (logged).
    pub fn load(&self, filename: &str) -> Option<Vec<u8>> {
        let path = self.path_of(filename).ok()?;
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not read image {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    /// Best-effort delete. Failures are logged, never raised. Names that
    /// are not plain filenames (e.g. remote URLs) are skipped.
    pub fn delete(&self, filename: &str) {
        let path = match self.path_of(filename) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("skipping image delete: {}", e);
                return;
            }
        };
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("could not delete image {}: {}", path.display(), e);
            }
        }
    }

    /// Best-effort delete of a batch of filenames.
    pub fn delete_many(&self, filenames: &[String]) {
        for filename in filenames {
            self.delete(filename);
        }
    }

    /// Enumerate stored filenames (unordered).
    pub fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if !entry.path().is_file() {
                    return None;
                }
                entry.file_name().to_str().map(|s| s.to_string())
            })
            .collect()
    }

    pub fn contains(&self, filename: &str) -> bool {
        match self.path_of(filename) {
            Ok(path) => path.is_file(),
            Err(_) => false,
        }
    }

    /// The store is flat: a reference must be a bare filename, not a path
    /// or URL.
    fn path_of(&self, filename: &str) -> Result<PathBuf, ImageError> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename == "."
            || filename == ".."
        {
            return Err(ImageError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }
}

fn normalize_extension(extension: &str) -> String {
    let ext: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if ext.is_empty() { "jpg".to_string() } else { ext }
}

use std::fs;
use std::path::PathBuf;

use crate::io::image_io::ImageStore;
use crate::io::journal_io::StoreError;
use crate::io::paths::DataDir;
use crate::model::profile::ProfileInfo;

/// Store for the singleton profile record in `profile.json`, plus its one
/// associated image file.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: &DataDir) -> Self {
        ProfileStore {
            path: dir.profile_file(),
        }
    }

    /// Load the profile. Missing or undecodable records yield the default
    /// profile (decode failures are logged and the file set aside).
    pub fn load(&self) -> ProfileInfo {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not read {}: {}", self.path.display(), e);
                }
                return ProfileInfo::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(profile) => profile,
            Err(e) => {
                crate::io::set_aside_corrupt(&self.path, &e);
                ProfileInfo::default()
            }
        }
    }

    pub fn save(&self, profile: &ProfileInfo) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(profile)?;
        crate::io::atomic_write(&self.path, content.as_bytes()).map_err(|e| {
            StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    /// Replace the profile photo.
    ///
    /// The profile owns at most one image file: the previous file is
    /// deleted before the new reference is recorded.
    pub fn set_image(
        &self,
        bytes: &[u8],
        extension: &str,
        images: &ImageStore,
    ) -> Result<String, StoreError> {
        let mut profile = self.load();
        if let Some(old) = profile.image_filename.take() {
            images.delete(&old);
        }
        let filename = images.save_bytes(bytes, extension)?;
        profile.image_filename = Some(filename.clone());
        self.save(&profile)?;
        Ok(filename)
    }

    /// Delete the profile photo file and clear the reference.
    pub fn clear_image(&self, images: &ImageStore) -> Result<(), StoreError> {
        let mut profile = self.load();
        if let Some(old) = profile.image_filename.take() {
            images.delete(&old);
            self.save(&profile)?;
        }
        Ok(())
    }
}

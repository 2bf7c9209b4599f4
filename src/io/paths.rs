use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const JOURNAL_FILE: &str = "journal.json";
pub const PROFILE_FILE: &str = "profile.json";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const IMAGES_DIR: &str = "images";

/// The jot data directory and the well-known paths inside it.
///
/// Everything jot persists lives under one directory: the journal
/// document, the profile record, user settings and the image store.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataDir { root: root.into() }
    }

    /// Resolve the default data directory: `$JOT_DATA_DIR`, then
    /// `$XDG_DATA_HOME/jot`, then `~/.local/share/jot`.
    pub fn resolve() -> Self {
        if let Ok(dir) = std::env::var("JOT_DATA_DIR") {
            return DataDir::new(dir);
        }
        let data_home = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
        DataDir::new(data_home.join("jot"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn journal_file(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE)
    }

    pub fn profile_file(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// Create the directory layout if it does not exist yet.
    pub fn ensure_layout(&self) -> io::Result<()> {
        fs::create_dir_all(self.images_dir())
    }
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

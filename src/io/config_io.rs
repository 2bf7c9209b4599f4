use std::fs;
use std::path::PathBuf;

use crate::io::paths::DataDir;
use crate::model::config::Settings;
use crate::model::journal::SortMode;

/// Error type for settings I/O
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse settings.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse settings.toml: {0}")]
    EditParseError(#[from] toml_edit::TomlError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Read the settings, returning defaults when no file exists.
pub fn read_settings(dir: &DataDir) -> Result<Settings, SettingsError> {
    let path = dir.settings_file();
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(SettingsError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

/// Read the settings document for round-trip-safe editing. A missing
/// file yields an empty document.
pub fn read_document(dir: &DataDir) -> Result<toml_edit::DocumentMut, SettingsError> {
    let path = dir.settings_file();
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(SettingsError::ReadError { path, source: e }),
    };
    Ok(text.parse()?)
}

/// Write the settings document back to disk, preserving formatting.
pub fn write_document(
    dir: &DataDir,
    doc: &toml_edit::DocumentMut,
) -> Result<(), SettingsError> {
    fs::write(dir.settings_file(), doc.to_string())?;
    Ok(())
}

/// Update the dashboard's default sort mode in the document.
pub fn set_default_sort(doc: &mut toml_edit::DocumentMut, mode: SortMode) {
    general_table(doc)["default_sort"] = toml_edit::value(mode.as_str());
}

/// Update the search debounce interval in the document.
pub fn set_debounce_ms(doc: &mut toml_edit::DocumentMut, ms: u64) {
    general_table(doc)["search_debounce_ms"] = toml_edit::value(ms as i64);
}

fn general_table(doc: &mut toml_edit::DocumentMut) -> &mut toml_edit::Item {
    if !doc.contains_key("general") {
        doc["general"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    &mut doc["general"]
}

use serde::{Deserialize, Serialize};

use crate::model::journal::SortMode;

/// User configuration from settings.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub location: LocationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Sort order the dashboard opens with.
    #[serde(default)]
    pub default_sort: SortMode,
    /// Idle delay before a search keystroke runs the filter.
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            default_sort: SortMode::default(),
            search_debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

/// Stand-in for the platform location services: a fixed position, a
/// denied switch, and a table of known places for geocoding lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    /// When true, location requests behave as if the user refused access.
    #[serde(default)]
    pub denied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Known places, used for reverse and forward lookups.
    #[serde(default)]
    pub places: Vec<PlaceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceEntry {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

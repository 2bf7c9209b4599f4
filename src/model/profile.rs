use serde::{Deserialize, Serialize};

/// The single user profile persisted in `profile.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    /// Filename of the profile photo in the image store. At most one file
    /// exists at a time — replacing the photo deletes the previous file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
}

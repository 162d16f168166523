//! The single user profile mirrored from the backend.

use serde::{Deserialize, Serialize};

const DEFAULT_DISPLAY_NAME: &str = "User";
const DEFAULT_DISPLAY_STATUS: &str = "Status";
const EMBEDDED_IMAGE_PREFIX: &str = "data:image";

/// User profile; `photo` is an encoded image or empty for the default avatar.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub photo: String,
}

impl Profile {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            photo: String::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        non_empty_or(&self.name, DEFAULT_DISPLAY_NAME)
    }

    pub fn display_status(&self) -> &str {
        non_empty_or(&self.status, DEFAULT_DISPLAY_STATUS)
    }

    /// Returns the stored photo when it is an embedded image, otherwise `None`
    /// and the presentation layer falls back to a generated avatar.
    pub fn embedded_photo(&self) -> Option<&str> {
        self.photo
            .starts_with(EMBEDDED_IMAGE_PREFIX)
            .then_some(self.photo.as_str())
    }

    /// Produces the profile that results from applying `update`.
    ///
    /// An empty photo in the update leaves the current photo untouched.
    pub fn updated_with(&self, update: &ProfileUpdate) -> Profile {
        Profile {
            name: update.name.clone(),
            status: update.status.clone(),
            photo: if update.photo.is_empty() {
                self.photo.clone()
            } else {
                update.photo.clone()
            },
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Canonical payload for the profile update action.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub photo: String,
}

impl ProfileUpdate {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            photo: String::new(),
        }
    }
}

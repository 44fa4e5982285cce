//! Extension settings.
//!
//! The host owns settings storage; this module reads it through the
//! [`SettingsStore`] trait and describes the switches the host should show.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::thumbnail::ThumbnailQuality;

/// Settings key: use high quality thumbnails.
pub const KEY_HIGH_QUALITY: &str = "high_quality";
/// Settings key: use MP4 audio formats instead of HLS.
pub const KEY_USE_MP4_FORMAT: &str = "use_mp4_format";
/// Settings key: resolve music metadata for music videos.
pub const KEY_RESOLVE_MUSIC_FOR_VIDEOS: &str = "resolve_music_for_videos";
/// Settings key: persisted visitor id.
pub const KEY_VISITOR_ID: &str = "visitor_id";

/// Host-provided settings storage.
pub trait SettingsStore: Send + Sync {
    /// Read a boolean; `None` if never set.
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// Read a string; `None` if never set.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a string (`None` clears it).
    fn put_string(&self, key: &str, value: Option<&str>);
}

/// Description of a boolean switch shown by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingSwitch {
    /// Display title.
    pub title: String,
    /// Storage key.
    pub key: String,
    /// Help text.
    pub summary: String,
    /// Value when never set.
    pub default_value: bool,
}

impl SettingSwitch {
    fn new(title: &str, key: &str, summary: &str, default_value: bool) -> Self {
        Self {
            title: title.to_string(),
            key: key.to_string(),
            summary: summary.to_string(),
            default_value,
        }
    }
}

/// The switches this extension exposes.
#[must_use]
pub fn setting_items() -> Vec<SettingSwitch> {
    vec![
        SettingSwitch::new(
            "High Thumbnail Quality",
            KEY_HIGH_QUALITY,
            "Use high quality thumbnails, will cause more data usage.",
            false,
        ),
        SettingSwitch::new(
            "Use MP4 Format",
            KEY_USE_MP4_FORMAT,
            "Use MP4 formats for audio streams, will turn off video & allow you to download music.",
            false,
        ),
        SettingSwitch::new(
            "Resolve Music for Videos",
            KEY_RESOLVE_MUSIC_FOR_VIDEOS,
            "Resolve actual music metadata for music videos, does slow down loading music videos.",
            true,
        ),
    ]
}

/// Snapshot of the extension settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtensionSettings {
    /// Use high quality thumbnails.
    #[serde(default)]
    pub high_quality: bool,
    /// Use MP4 audio formats instead of the HLS manifest.
    #[serde(default)]
    pub use_mp4_format: bool,
    /// Look up the music track behind a generic video.
    #[serde(default = "default_true")]
    pub resolve_music_for_videos: bool,
    /// Persisted anonymous visitor id.
    #[serde(default)]
    pub visitor_id: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            high_quality: false,
            use_mp4_format: false,
            resolve_music_for_videos: true,
            visitor_id: None,
        }
    }
}

impl ExtensionSettings {
    /// Read the current settings from the host store, defaulting unset keys.
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        let settings = Self {
            high_quality: store
                .get_bool(KEY_HIGH_QUALITY)
                .unwrap_or(defaults.high_quality),
            use_mp4_format: store
                .get_bool(KEY_USE_MP4_FORMAT)
                .unwrap_or(defaults.use_mp4_format),
            resolve_music_for_videos: store
                .get_bool(KEY_RESOLVE_MUSIC_FOR_VIDEOS)
                .unwrap_or(defaults.resolve_music_for_videos),
            visitor_id: store.get_string(KEY_VISITOR_ID),
        };
        debug!("Loaded settings: {:?}", settings);
        settings
    }

    /// Parse settings from JSON, defaulting missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            warn!("Failed to parse settings: {}", e);
            Error::Configuration(format!("Failed to parse settings: {e}"))
        })
    }

    /// Thumbnail tier for this snapshot.
    #[must_use]
    pub const fn thumbnail_quality(&self) -> ThumbnailQuality {
        ThumbnailQuality::from_high_quality(self.high_quality)
    }
}

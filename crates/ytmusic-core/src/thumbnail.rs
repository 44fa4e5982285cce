//! Thumbnail resolution for catalog items.
//!
//! This module provides functionality to:
//! - Resolve a catalog thumbnail descriptor at a requested quality tier
//! - Synthesize a predictable per-video thumbnail when a song has none
//!
//! Nothing here touches the network; the host fetches and caches images.

use serde::{Deserialize, Serialize};

use crate::model::ImageHolder;

/// Square edge in pixels requested from resizable thumbnails at low quality.
pub const LOW_THUMBNAIL_SIZE: u32 = 180;

/// Square edge in pixels requested from resizable thumbnails at high quality.
pub const HIGH_THUMBNAIL_SIZE: u32 = 720;

/// Thumbnail quality tier, chosen once per call from settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailQuality {
    /// Small images, less data usage.
    #[default]
    Low,
    /// Large images.
    High,
}

impl ThumbnailQuality {
    /// Pick the tier from the "high quality" switch.
    #[must_use]
    pub const fn from_high_quality(high_quality: bool) -> Self {
        if high_quality { Self::High } else { Self::Low }
    }

    const fn edge(self) -> u32 {
        match self {
            Self::Low => LOW_THUMBNAIL_SIZE,
            Self::High => HIGH_THUMBNAIL_SIZE,
        }
    }
}

/// A catalog thumbnail descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThumbnailProvider {
    /// Fixed URLs for each tier; either may be missing.
    Fixed {
        /// URL of the smallest rendition.
        #[serde(default)]
        low_url: Option<String>,
        /// URL of the largest rendition.
        #[serde(default)]
        high_url: Option<String>,
    },
    /// Resizable image: the final URL is `url_a` + `w<N>-h<N>` + `url_b`.
    Dynamic {
        /// URL prefix before the size segment.
        url_a: String,
        /// URL suffix after the size segment.
        #[serde(default)]
        url_b: String,
    },
}

/// One entry of a raw thumbnail list as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawThumbnail {
    /// Image URL.
    pub url: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
}

impl ThumbnailProvider {
    /// Build a fixed provider from a raw thumbnail list, smallest as low and
    /// largest as high.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn from_thumbnails(thumbnails: &[RawThumbnail]) -> Option<Self> {
        let area = |t: &&RawThumbnail| u64::from(t.width) * u64::from(t.height);
        let low = thumbnails.iter().min_by_key(area)?;
        let high = thumbnails.iter().max_by_key(area)?;
        Some(Self::Fixed {
            low_url: Some(low.url.clone()),
            high_url: Some(high.url.clone()),
        })
    }

    /// Resolve the URL for a quality tier, falling back to the other tier.
    #[must_use]
    pub fn url(&self, quality: ThumbnailQuality) -> Option<String> {
        match self {
            Self::Fixed { low_url, high_url } => match quality {
                ThumbnailQuality::Low => low_url.clone().or_else(|| high_url.clone()),
                ThumbnailQuality::High => high_url.clone().or_else(|| low_url.clone()),
            },
            Self::Dynamic { url_a, url_b } => {
                let edge = quality.edge();
                Some(format!("{url_a}w{edge}-h{edge}{url_b}"))
            }
        }
    }
}

/// Resolve an optional descriptor into an image reference.
#[must_use]
pub fn resolve_cover(
    provider: Option<&ThumbnailProvider>,
    quality: ThumbnailQuality,
    crop: bool,
) -> Option<ImageHolder> {
    provider
        .and_then(|p| p.url(quality))
        .map(|url| ImageHolder::new(url, crop))
}

/// Generate a `YouTube` thumbnail URL for a video ID at a quality tier.
#[must_use]
pub fn youtube_thumbnail_url(video_id: &str, quality: ThumbnailQuality) -> String {
    // https://img.youtube.com/vi/{VIDEO_ID}/{QUALITY}.jpg
    match quality {
        ThumbnailQuality::Low => format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg"),
        ThumbnailQuality::High => {
            format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
        }
    }
}

/// Cover for a song: the explicit descriptor if any, else the per-video URL.
///
/// Song covers are always cropped.
#[must_use]
pub fn song_cover(
    video_id: &str,
    provider: Option<&ThumbnailProvider>,
    quality: ThumbnailQuality,
) -> ImageHolder {
    resolve_cover(provider, quality, true)
        .unwrap_or_else(|| ImageHolder::new(youtube_thumbnail_url(video_id, quality), true))
}

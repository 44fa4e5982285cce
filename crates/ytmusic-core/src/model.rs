//! Normalized domain entities handed to the host.
//!
//! These are the stable shapes the host consumes regardless of how the
//! catalog laid out its response. Service-specific continuation data rides
//! along in the string-keyed `extras` maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::paged::PagedData;

/// Extras key: browse id of the "related" feed for a track or playlist.
pub const EXTRA_RELATED_ID: &str = "relatedId";
/// Extras key: browse id of a track's lyrics.
pub const EXTRA_LYRICS_ID: &str = "lyricsId";
/// Extras key: per-playlist slot id of a track.
pub const EXTRA_SET_ID: &str = "setId";
/// Extras key: comma-joined set ids of a playlist's items.
pub const EXTRA_ITEM_SET_IDS: &str = "itemSetIds";
/// Extras key: channel id used to (un)subscribe to an artist.
pub const EXTRA_SUBSCRIBE_ID: &str = "subId";
/// Extras key: login cookie stored on a user returned from login.
pub const EXTRA_COOKIE: &str = "cookie";
/// Extras key: authorization header stored on a user returned from login.
pub const EXTRA_AUTH: &str = "auth";

/// Display name used when the catalog omits one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// String-keyed extras carried on entities.
pub type Extras = BTreeMap<String, String>;

/// A reference to a remote image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageHolder {
    /// Image URL.
    pub url: String,
    /// Whether the host should center-crop the image to a square.
    pub crop: bool,
}

impl ImageHolder {
    /// Create a new image reference.
    pub fn new(url: impl Into<String>, crop: bool) -> Self {
        Self {
            url: url.into(),
            crop,
        }
    }
}

/// An artist profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Artist {
    /// Channel id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Profile image.
    pub cover: Option<ImageHolder>,
    /// About text.
    pub description: Option<String>,
    /// Subscriber count.
    pub followers: Option<u64>,
    /// Service-specific data.
    pub extras: Extras,
}

impl Artist {
    /// Create an artist with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A channel seen from the session's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    /// Channel or page id; empty for the primary account.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Profile image.
    pub cover: Option<ImageHolder>,
    /// Service-specific data (login cookie and auth header after login).
    pub extras: Extras,
}

impl User {
    /// Project this user onto an artist, keeping id, name, cover and extras.
    #[must_use]
    pub fn to_artist(&self) -> Artist {
        Artist {
            id: self.id.clone(),
            name: self.name.clone(),
            cover: self.cover.clone(),
            description: None,
            followers: None,
            extras: self.extras.clone(),
        }
    }
}

/// An album release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Album {
    /// Browse id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Artwork.
    pub cover: Option<ImageHolder>,
    /// Credited artists.
    pub artists: Vec<Artist>,
    /// Number of tracks, if known.
    pub track_count: Option<u32>,
    /// Release year.
    pub release_date: Option<String>,
    /// Total duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Description.
    pub description: Option<String>,
    /// Secondary display line.
    pub subtitle: Option<String>,
}

/// A user or editorial playlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Playlist {
    /// Playlist id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Whether the current session owns the playlist.
    pub is_editable: bool,
    /// Artwork.
    pub cover: Option<ImageHolder>,
    /// Owners / credited channels.
    pub authors: Vec<User>,
    /// Number of tracks, if known.
    pub track_count: Option<u32>,
    /// Total duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Year of creation.
    pub creation_date: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Secondary display line.
    pub subtitle: Option<String>,
    /// Service-specific data.
    pub extras: Extras,
}

/// A playable track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Track {
    /// Video id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Credited artists.
    pub artists: Vec<Artist>,
    /// Artwork.
    pub cover: Option<ImageHolder>,
    /// Album the track belongs to.
    pub album: Option<Album>,
    /// Duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Play count.
    pub plays: Option<u64>,
    /// Release year, taken from the album.
    pub release_date: Option<String>,
    /// Liked/explicit marker as reported upstream.
    pub liked: bool,
    /// Video description, filled on full load.
    pub description: Option<String>,
    /// Playable variants, filled on full load.
    pub streamables: Vec<Streamable>,
    /// Service-specific data (`relatedId`, `lyricsId`, `setId`).
    pub extras: Extras,
}

impl Track {
    /// Create a bare track reference.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// The per-playlist slot id, if this track came from a playlist load.
    #[must_use]
    pub fn set_id(&self) -> Option<&str> {
        self.extras.get(EXTRA_SET_ID).map(String::as_str)
    }
}

/// Whether a streamable carries audio or video.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Audio-only rendition.
    Audio,
    /// Video rendition.
    Video,
}

/// Container format of a streamable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    /// Segmented HLS playlist.
    Hls,
    /// Progressive MP4/WebM download.
    Progressive,
}

/// One playable variant of a track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Streamable {
    /// Playable URL.
    pub url: String,
    /// Bitrate or group tag for audio, vertical resolution for video.
    pub quality: u32,
    /// Audio or video.
    pub media_type: MediaType,
    /// Container format.
    pub format: StreamFormat,
}

impl Streamable {
    /// Audio variant.
    pub fn audio(url: impl Into<String>, quality: u32, format: StreamFormat) -> Self {
        Self {
            url: url.into(),
            quality,
            media_type: MediaType::Audio,
            format,
        }
    }

    /// Video variant.
    pub fn video(url: impl Into<String>, quality: u32, format: StreamFormat) -> Self {
        Self {
            url: url.into(),
            quality,
            media_type: MediaType::Video,
            format,
        }
    }
}

/// A generated radio station.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Radio {
    /// `radio_<seed id>`.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Tracks of the first radio page.
    pub tracks: Vec<Track>,
    /// Cursor to continue the radio.
    pub continuation: Option<String>,
}

/// Any presentable catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaItem {
    /// A track.
    Track(Track),
    /// An album.
    Album(Album),
    /// A playlist.
    Playlist(Playlist),
    /// An artist.
    Artist(Artist),
    /// A user.
    User(User),
    /// A radio.
    Radio(Radio),
}

impl MediaItem {
    /// Id of the wrapped entity.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Track(t) => &t.id,
            Self::Album(a) => &a.id,
            Self::Playlist(p) => &p.id,
            Self::Artist(a) => &a.id,
            Self::User(u) => &u.id,
            Self::Radio(r) => &r.id,
        }
    }

    /// Display title of the wrapped entity.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Track(t) => &t.title,
            Self::Album(a) => &a.title,
            Self::Playlist(p) => &p.title,
            Self::Artist(a) => &a.name,
            Self::User(u) => &u.name,
            Self::Radio(r) => &r.title,
        }
    }
}

/// A row of the home, search, library or artist feed.
#[derive(Clone)]
pub enum Shelf {
    /// A titled group of items with an optional "more" listing.
    Category {
        /// Display title.
        title: String,
        /// Display subtitle.
        subtitle: Option<String>,
        /// Items shown inline.
        items: Vec<MediaItem>,
        /// Full listing behind "view more".
        more: Option<PagedData<MediaItem>>,
    },
    /// A single item row.
    Item(MediaItem),
}

impl std::fmt::Debug for Shelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category {
                title,
                subtitle,
                items,
                more,
            } => f
                .debug_struct("Category")
                .field("title", title)
                .field("subtitle", subtitle)
                .field("items", items)
                .field("has_more", &more.is_some())
                .finish(),
            Self::Item(item) => f.debug_tuple("Item").field(item).finish(),
        }
    }
}

/// A feed tab (home chips, search filters, library sections).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    /// Params or browse id identifying the tab.
    pub id: String,
    /// Display title.
    pub title: String,
}

impl Tab {
    /// Create a tab.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A search suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickSearchItem {
    /// Suggested query.
    pub query: String,
    /// Whether it comes from the user's search history.
    pub from_history: bool,
}

/// One timed lyric line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lyric {
    /// Line text.
    pub text: String,
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// End offset in milliseconds.
    pub end_ms: u64,
}

/// Lyrics of a track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lyrics {
    /// Lyrics browse id.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Lyrics provider credit.
    pub source: Option<String>,
    /// Timed lines.
    pub lines: Vec<Lyric>,
}

//! Raw catalog records as returned by a [`CatalogClient`](crate::client::CatalogClient).
//!
//! These mirror the loosely-typed catalog responses: nearly everything is
//! optional and defaults when absent. The [`convert`](crate::convert) module
//! turns them into domain entities.

use serde::{Deserialize, Serialize};

use crate::thumbnail::ThumbnailProvider;

/// Id of the synthetic "liked songs" playlist, never listed as a playlist.
pub const LIKED_SONGS_PLAYLIST_ID: &str = "VLSE";

/// Music video type of official audio tracks ("art tracks").
pub const MUSIC_VIDEO_TYPE_ATV: &str = "MUSIC_VIDEO_TYPE_ATV";

/// A UI string with its machine-readable (English) form and a localized form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UiString {
    /// Locale-independent text, used for classification.
    pub raw: String,
    /// Text in the display language.
    #[serde(default)]
    pub localized: Option<String>,
}

impl UiString {
    /// Create a string with no localized form.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            localized: None,
        }
    }

    /// Text for display: localized if present, else the raw form.
    #[must_use]
    pub fn display(&self) -> &str {
        self.localized.as_deref().unwrap_or(&self.raw)
    }
}

/// Secondary discriminant of a playlist-shaped record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaylistType {
    /// A user or editorial playlist.
    #[default]
    Playlist,
    /// An album release.
    Album,
    /// An EP.
    Ep,
    /// A generated radio.
    Radio,
    /// Anything else.
    #[serde(other)]
    Unknown,
}

/// A song/video record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawSong {
    /// Video id.
    pub id: String,
    /// Title.
    pub name: Option<String>,
    /// Credited artists.
    pub artists: Option<Vec<RawArtist>>,
    /// Album the song belongs to.
    pub album: Option<RawPlaylist>,
    /// Thumbnail descriptor.
    pub thumbnail_provider: Option<ThumbnailProvider>,
    /// Duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Explicit marker.
    pub is_explicit: bool,
    /// Browse id of the "related" feed.
    pub related_browse_id: Option<String>,
    /// Browse id of the lyrics.
    pub lyrics_browse_id: Option<String>,
}

/// A playlist or album record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawPlaylist {
    /// Playlist or browse id.
    pub id: String,
    /// Title.
    pub name: Option<String>,
    /// Album vs playlist discriminant.
    pub playlist_type: Option<PlaylistType>,
    /// Channel id of the owner.
    pub owner_id: Option<String>,
    /// Credited artists / owners.
    pub artists: Option<Vec<RawArtist>>,
    /// Thumbnail descriptor.
    pub thumbnail_provider: Option<ThumbnailProvider>,
    /// Number of items.
    pub item_count: Option<u32>,
    /// Total duration in milliseconds.
    pub total_duration_ms: Option<u64>,
    /// Release or creation year.
    pub year: Option<u32>,
    /// Description.
    pub description: Option<String>,
    /// Set ids of the playlist's items, in order.
    pub item_set_ids: Option<Vec<String>>,
}

impl RawPlaylist {
    /// Whether the record is the synthetic liked-songs container.
    #[must_use]
    pub fn is_liked_songs(&self) -> bool {
        self.id == LIKED_SONGS_PLAYLIST_ID
    }

    /// Whether the record declares itself an album.
    #[must_use]
    pub fn is_album(&self) -> bool {
        self.playlist_type == Some(PlaylistType::Album)
    }
}

/// An artist/channel record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawArtist {
    /// Channel id.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Thumbnail descriptor.
    pub thumbnail_provider: Option<ThumbnailProvider>,
    /// About text.
    pub description: Option<String>,
    /// Subscriber count.
    pub subscriber_count: Option<u64>,
    /// Channel id to use for (un)subscribe calls.
    pub subscribe_channel_id: Option<String>,
    /// Artist page rows, present on a full artist load.
    pub layouts: Option<Vec<RawLayout>>,
}

/// Closed union of catalog records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawItem {
    /// A song or video.
    Song(RawSong),
    /// A playlist or album.
    Playlist(RawPlaylist),
    /// An artist or channel.
    Artist(RawArtist),
    /// Any record kind this crate does not present.
    #[serde(other)]
    Unsupported,
}

/// Link to a "view more" page of a layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ViewMore {
    /// Browse id of the full listing.
    pub browse_id: Option<String>,
    /// Browse params of the full listing.
    pub params: Option<String>,
}

/// A titled row of items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawLayout {
    /// Row title.
    pub title: Option<UiString>,
    /// Row subtitle.
    pub subtitle: Option<UiString>,
    /// Row items.
    pub items: Vec<RawItem>,
    /// Full listing link.
    pub view_more: Option<ViewMore>,
}

/// A feed filter chip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FilterChip {
    /// Chip label.
    pub text: UiString,
    /// Params selecting the filtered feed.
    pub params: String,
}

/// One page of a song feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct FeedPage {
    /// Feed rows.
    pub layouts: Vec<RawLayout>,
    /// Cursor of the next page.
    pub continuation: Option<String>,
    /// Filter chips shown above the feed.
    pub filter_chips: Vec<FilterChip>,
}

/// A search filter (tab) attached to a result category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SearchFilter {
    /// Params selecting the filtered search.
    pub params: String,
}

/// One category of search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SearchCategory {
    /// Result row.
    pub layout: RawLayout,
    /// Filter for this category, if any.
    pub filter: Option<SearchFilter>,
}

/// Search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SearchResults {
    /// Result categories in display order.
    pub categories: Vec<SearchCategory>,
}

/// A search suggestion record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SearchSuggestion {
    /// Suggested text.
    pub text: String,
    /// Whether it comes from history.
    pub is_from_history: bool,
}

/// A playlist slot: the song plus its per-playlist set id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PlaylistEntry {
    /// The song.
    pub song: RawSong,
    /// Slot id.
    pub set_id: Option<String>,
}

/// One page of a playlist load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PlaylistPage {
    /// The container header.
    pub playlist: RawPlaylist,
    /// Related-shelves cursor, or `id://<trackId>`.
    pub related_id: Option<String>,
    /// Slots of this page.
    pub entries: Vec<PlaylistEntry>,
    /// Cursor of the next page.
    pub continuation: Option<String>,
}

/// A page of radio songs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RadioPage {
    /// Songs.
    pub items: Vec<RawSong>,
    /// Cursor of the next page.
    pub continuation: Option<String>,
}

/// A page of a library listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LibraryPage {
    /// Items.
    pub items: Vec<RawItem>,
    /// Cursor of the next page.
    pub continuation: Option<String>,
}

/// A timed lyric line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawLyricLine {
    /// Line text.
    pub text: String,
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// End offset in milliseconds.
    pub end_ms: u64,
}

/// Lyrics response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawLyrics {
    /// Timed lines.
    pub lines: Vec<RawLyricLine>,
    /// Provider credit.
    pub source: Option<String>,
}

/// Video details of a player response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct VideoDetails {
    /// Video id.
    pub video_id: String,
    /// Title.
    pub title: Option<String>,
    /// Uploader name.
    pub author: Option<String>,
    /// Uploader channel id.
    pub channel_id: Option<String>,
    /// View count as a decimal string.
    pub view_count: Option<String>,
    /// Music video type, e.g. `MUSIC_VIDEO_TYPE_ATV`.
    pub music_video_type: Option<String>,
}

/// An adaptive (progressive) format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AdaptiveFormat {
    /// Direct URL; absent for ciphered formats.
    pub url: Option<String>,
    /// Mime type, e.g. `audio/mp4; codecs="mp4a.40.2"`.
    pub mime_type: String,
    /// Bitrate in bits per second.
    pub bitrate: u32,
}

/// Streaming data of a player response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct StreamingData {
    /// HLS master manifest URL.
    pub hls_manifest_url: Option<String>,
    /// Adaptive formats.
    pub adaptive_formats: Vec<AdaptiveFormat>,
    /// Seconds until the URLs expire.
    pub expires_in_seconds: Option<u64>,
}

/// Player response: video details, streaming data and description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RawVideo {
    /// Video details.
    pub details: VideoDetails,
    /// Streaming data.
    pub streaming_data: StreamingData,
    /// Video description.
    pub description: Option<String>,
}

/// Result of a playlist edit batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EditOutcome {
    /// Set ids minted for added videos, in request order.
    pub added_set_ids: Vec<String>,
}

//! Remote collaborators: the catalog API and raw HTTP.
//!
//! [`CatalogClient`] is the typed catalog surface this crate drives. Calls
//! that take an [`AuthState`] must only be issued through
//! [`Session::with_auth`](crate::auth::Session::with_auth).
//!
//! [`HttpClient`] covers the two raw fetches outside the catalog: the HLS
//! manifest and the account switcher.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthState;
use crate::error::{Error, Result};
use crate::playlist_edit::EditAction;
use crate::raw::{
    EditOutcome, FeedPage, LibraryPage, PlaylistPage, RadioPage, RawArtist, RawItem, RawLayout,
    RawLyrics, RawPlaylist, RawSong, RawVideo, SearchResults, SearchSuggestion, ViewMore,
};

/// Default timeout for raw HTTP fetches.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Rating sent by a like/unlike call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LikeStatus {
    /// Thumbs up.
    Liked,
    /// No rating.
    Neutral,
}

impl LikeStatus {
    /// Status for a like toggle.
    #[must_use]
    pub const fn from_liked(liked: bool) -> Self {
        if liked { Self::Liked } else { Self::Neutral }
    }
}

/// The remote music catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// One page of a song feed, selected by filter params or browse id.
    async fn song_feed(
        &self,
        params: Option<String>,
        continuation: Option<String>,
        browse_id: Option<String>,
    ) -> Result<FeedPage>;

    /// Items behind a row's "view more" browse id.
    async fn view_more(&self, browse_id: String) -> Result<Vec<RawItem>>;

    /// Search, optionally restricted by filter params.
    async fn search(&self, query: String, params: Option<String>) -> Result<SearchResults>;

    /// Suggestions for a partial query.
    async fn search_suggestions(&self, query: String) -> Result<Vec<SearchSuggestion>>;

    /// Remove a query from the search history.
    async fn delete_search_suggestion(&self, query: String) -> Result<()>;

    /// Song metadata.
    async fn load_song(&self, video_id: String) -> Result<RawSong>;

    /// Player response: video details and streaming data.
    async fn get_video(&self, video_id: String) -> Result<RawVideo>;

    /// One page of a playlist or album (`None` continuation for the first).
    async fn load_playlist_page(
        &self,
        playlist_id: String,
        continuation: Option<String>,
    ) -> Result<PlaylistPage>;

    /// Full artist page.
    async fn load_artist(&self, artist_id: String) -> Result<RawArtist>;

    /// Rows behind an artist row's "view more" link.
    async fn artist_more(&self, view_more: ViewMore) -> Result<Vec<RawLayout>>;

    /// Radio seeded by an artist.
    async fn artist_radio(
        &self,
        artist_id: String,
        continuation: Option<String>,
    ) -> Result<RadioPage>;

    /// Radio seeded by a song.
    async fn song_radio(&self, video_id: String, continuation: Option<String>)
    -> Result<RadioPage>;

    /// Related rows of a playlist.
    async fn related_from_playlist(&self, related_id: String) -> Result<Vec<RawLayout>>;

    /// Timed lyrics, if the catalog has them.
    async fn lyrics(&self, lyrics_id: String) -> Result<Option<RawLyrics>>;

    /// A fresh anonymous visitor id.
    async fn visitor_id(&self) -> Result<String>;

    /// Use `visitor_id` for anonymous requests.
    fn set_visitor_id(&self, visitor_id: String);

    /// One page of a library section.
    async fn library_feed(
        &self,
        auth: &AuthState,
        browse_id: String,
        continuation: Option<String>,
    ) -> Result<LibraryPage>;

    /// Playlists of the account.
    async fn account_playlists(&self, auth: &AuthState) -> Result<Vec<RawPlaylist>>;

    /// Create a playlist, returning its id.
    async fn create_playlist(
        &self,
        auth: &AuthState,
        title: String,
        description: String,
    ) -> Result<String>;

    /// Delete a playlist.
    async fn delete_playlist(&self, auth: &AuthState, playlist_id: String) -> Result<()>;

    /// Rate a song.
    async fn set_song_liked(
        &self,
        auth: &AuthState,
        video_id: String,
        status: LikeStatus,
    ) -> Result<()>;

    /// Subscribe to or unsubscribe from an artist.
    async fn set_subscribed(
        &self,
        auth: &AuthState,
        artist_id: String,
        subscribed: bool,
        subscribe_channel_id: String,
    ) -> Result<()>;

    /// Apply one batch of playlist edit actions.
    async fn edit_playlist(
        &self,
        auth: &AuthState,
        playlist_id: String,
        actions: Vec<EditAction>,
    ) -> Result<EditOutcome>;

    /// Record a play in the watch history.
    async fn mark_watched(&self, auth: &AuthState, video_id: String) -> Result<()>;
}

/// Raw text fetches.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` with extra headers and return the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] on a non-success status and
    /// [`Error::Network`] on transport failures.
    async fn get_text(&self, url: &str, headers: &[(String, String)]) -> Result<String>;
}

/// [`HttpClient`] backed by an async reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network_error(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Create a client with [`DEFAULT_HTTP_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_default_timeout() -> Result<Self> {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_text(&self, url: &str, headers: &[(String, String)]) -> Result<String> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network_error(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network_error(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(Error::remote(status.as_u16(), body));
        }
        Ok(body)
    }
}

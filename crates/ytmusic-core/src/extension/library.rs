//! Containers, artists, the user library and playlist edits.

use std::sync::Arc;

use tracing::{debug, info};

use super::YoutubeExtension;
use crate::client::LikeStatus;
use crate::convert::{
    ConvertContext, to_album, to_artist, to_media_item, to_playlist, to_playlists, to_track,
    to_user,
};
use crate::error::{Error, Result};
use crate::model::{Album, Artist, EXTRA_SUBSCRIBE_ID, Playlist, Shelf, Tab, Track, User};
use crate::paged::{Page, PagedData};
use crate::raw::{PlaylistPage, RawArtist};
use crate::thumbnail::ThumbnailQuality;

/// Browse id of the library landing page, used when no tab is selected.
pub const LIBRARY_LANDING_ID: &str = "FEmusic_library_landing";

const LIBRARY_TABS: [(&str, &str); 5] = [
    (LIBRARY_LANDING_ID, "All"),
    ("FEmusic_history", "History"),
    ("FEmusic_liked_playlists", "Playlists"),
    ("FEmusic_liked_videos", "Songs"),
    ("FEmusic_library_corpus_track_artists", "Artists"),
];

fn page_tracks(page: &PlaylistPage, quality: ThumbnailQuality) -> Vec<Track> {
    page.entries
        .iter()
        .map(|entry| to_track(&entry.song, quality, entry.set_id.as_deref()))
        .collect()
}

impl YoutubeExtension {
    /// Fetch the first page of a container and cache its track source.
    ///
    /// The source serves the already fetched first page and loads the rest
    /// on demand.
    async fn load_container(&self, container_id: &str) -> Result<PlaylistPage> {
        let quality = self.quality();
        let first = self
            .client
            .load_playlist_page(container_id.to_string(), None)
            .await?;
        debug!(
            "Loaded first page of {} ({} entries, more: {})",
            container_id,
            first.entries.len(),
            first.continuation.is_some()
        );

        let first_tracks = page_tracks(&first, quality);
        let first_continuation = first.continuation.clone();
        let client = Arc::clone(&self.client);
        let id = container_id.to_string();
        let tracks = PagedData::continuous(move |token: Option<String>| {
            let client = Arc::clone(&client);
            let id = id.clone();
            let first_tracks = first_tracks.clone();
            let first_continuation = first_continuation.clone();
            async move {
                match token {
                    None => Ok(Page::new(first_tracks, first_continuation)),
                    Some(token) => {
                        let page = client.load_playlist_page(id, Some(token)).await?;
                        Ok(Page::new(page_tracks(&page, quality), page.continuation))
                    }
                }
            }
        });
        self.session.tracks().put(container_id, tracks).await;
        Ok(first)
    }

    /// Load an album header; its tracks become available via
    /// [`load_tracks`](Self::load_tracks).
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn load_album(&self, album: &Album) -> Result<Album> {
        let page = self.load_container(&album.id).await?;
        Ok(to_album(&page.playlist, false, ThumbnailQuality::High))
    }

    /// Load a playlist header; its tracks become available via
    /// [`load_tracks`](Self::load_tracks).
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn load_playlist(&self, playlist: &Playlist) -> Result<Playlist> {
        let page = self.load_container(&playlist.id).await?;
        let own = self.own_channel_id().await;
        let ctx = ConvertContext::new(ThumbnailQuality::High).with_own_channel_id(own.as_deref());
        Ok(to_playlist(&page.playlist, ctx, page.related_id.as_deref()))
    }

    /// Tracks of a previously loaded album or playlist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TrackListNotLoaded`] if the container was never loaded.
    pub async fn load_tracks(&self, container_id: &str) -> Result<PagedData<Track>> {
        self.session.tracks().get(container_id).await
    }

    async fn fetch_artist(&self, artist_id: &str) -> Result<RawArtist> {
        let artist = self.client.load_artist(artist_id.to_string()).await?;
        *self.memo.loaded_artist.write().await = Some(artist.clone());
        Ok(artist)
    }

    /// Load an artist profile. The page is kept for a following
    /// [`artist_shelves`](Self::artist_shelves) read.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn load_artist(&self, artist: &Artist) -> Result<Artist> {
        let raw = self.fetch_artist(&artist.id).await?;
        Ok(to_artist(&raw, ThumbnailQuality::High))
    }

    /// Load a user's channel.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn load_user(&self, user: &User) -> Result<User> {
        let raw = self.fetch_artist(&user.to_artist().id).await?;
        Ok(to_user(&raw, ThumbnailQuality::High))
    }

    async fn set_following(&self, artist: &Artist, follow: bool) -> Result<()> {
        let sub_id = artist
            .extras
            .get(EXTRA_SUBSCRIBE_ID)
            .cloned()
            .ok_or_else(|| Error::invalid_input("No subId found"))?;
        let client = Arc::clone(&self.client);
        let artist_id = artist.id.clone();
        self.session
            .with_auth(|auth| async move {
                client
                    .set_subscribed(&auth, artist_id, follow, sub_id)
                    .await
            })
            .await?;
        info!("Set following of {} to {}", artist.id, follow);
        Ok(())
    }

    /// Subscribe to an artist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the artist has no `subId` extra;
    /// otherwise propagates auth and remote errors.
    pub async fn follow_artist(&self, artist: &Artist) -> Result<()> {
        self.set_following(artist, true).await
    }

    /// Unsubscribe from an artist.
    ///
    /// # Errors
    ///
    /// Same as [`follow_artist`](Self::follow_artist).
    pub async fn unfollow_artist(&self, artist: &Artist) -> Result<()> {
        self.set_following(artist, false).await
    }

    /// Sections of the user library.
    #[must_use]
    pub fn library_tabs(&self) -> Vec<Tab> {
        LIBRARY_TABS
            .iter()
            .map(|(id, title)| Tab::new(*id, *title))
            .collect()
    }

    /// Items of a library section, the landing page by default.
    ///
    /// Every page needs a session; reading without one fails with
    /// [`Error::LoginRequired`].
    #[must_use]
    pub fn library_feed(&self, tab: Option<&Tab>) -> PagedData<Shelf> {
        let ext = self.clone();
        let browse_id = tab.map_or_else(|| LIBRARY_LANDING_ID.to_string(), |t| t.id.clone());
        PagedData::continuous(move |token: Option<String>| {
            let ext = ext.clone();
            let browse_id = browse_id.clone();
            async move {
                let client = Arc::clone(&ext.client);
                let page = ext
                    .session
                    .with_auth(|auth| async move {
                        client.library_feed(&auth, browse_id, token).await
                    })
                    .await?;
                let quality = ext.quality();
                let own = ext.own_channel_id().await;
                let ctx = ConvertContext::new(quality).with_own_channel_id(own.as_deref());
                let shelves = page
                    .items
                    .iter()
                    .filter_map(|item| to_media_item(item, false, ctx))
                    .map(Shelf::Item)
                    .collect();
                Ok(Page::new(shelves, page.continuation))
            }
        })
    }

    /// Create a playlist and load it.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn create_playlist(&self, title: &str, description: Option<&str>) -> Result<Playlist> {
        let client = Arc::clone(&self.client);
        let title = title.to_string();
        let description = description.unwrap_or_default().to_string();
        let id = self
            .session
            .with_auth(|auth| async move {
                client.create_playlist(&auth, title, description).await
            })
            .await?;
        info!("Created playlist {}", id);
        self.load_playlist(&Playlist {
            id,
            ..Playlist::default()
        })
        .await
    }

    /// Delete a playlist.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn delete_playlist(&self, playlist: &Playlist) -> Result<()> {
        let client = Arc::clone(&self.client);
        let playlist_id = playlist.id.clone();
        self.session
            .with_auth(|auth| async move { client.delete_playlist(&auth, playlist_id).await })
            .await?;
        info!("Deleted playlist {}", playlist.id);
        Ok(())
    }

    /// Like or unlike a track.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn like_track(&self, track: &Track, liked: bool) -> Result<()> {
        let client = Arc::clone(&self.client);
        let video_id = track.id.clone();
        self.session
            .with_auth(|auth| async move {
                client
                    .set_song_liked(&auth, video_id, LikeStatus::from_liked(liked))
                    .await
            })
            .await
    }

    /// Playlists the session can add tracks to.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn editable_playlists(&self) -> Result<Vec<Playlist>> {
        let client = Arc::clone(&self.client);
        let playlists = self
            .session
            .with_auth(|auth| async move { client.account_playlists(&auth).await })
            .await?;
        let own = self.own_channel_id().await;
        let ctx = ConvertContext::new(self.quality()).with_own_channel_id(own.as_deref());
        Ok(to_playlists(&playlists, ctx))
    }

    /// Rename a playlist and, when given, replace its description.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn edit_playlist_metadata(
        &self,
        playlist: &Playlist,
        title: &str,
        description: Option<&str>,
    ) -> Result<()> {
        self.editor
            .edit_metadata(&playlist.id, title, description)
            .await
    }

    /// Insert `new_tracks` before position `index` of the `tracks` snapshot.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn add_tracks_to_playlist(
        &self,
        playlist: &Playlist,
        tracks: &[Track],
        index: usize,
        new_tracks: &[Track],
    ) -> Result<()> {
        self.editor
            .add_tracks(&playlist.id, tracks, index, new_tracks)
            .await
    }

    /// Remove the tracks at `indexes` of the `tracks` snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an index without a slot id;
    /// otherwise propagates auth and remote errors.
    pub async fn remove_tracks_from_playlist(
        &self,
        playlist: &Playlist,
        tracks: &[Track],
        indexes: &[usize],
    ) -> Result<()> {
        self.editor
            .remove_tracks(&playlist.id, tracks, indexes)
            .await
    }

    /// Move the track at `from` to `to` within the `tracks` snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `from` has no slot id; otherwise
    /// propagates auth and remote errors.
    pub async fn move_track_in_playlist(
        &self,
        playlist: &Playlist,
        tracks: &[Track],
        from: usize,
        to: usize,
    ) -> Result<()> {
        self.editor
            .move_track(&playlist.id, tracks, from, to)
            .await
    }

    /// Record a play in the watch history. Does nothing without a session.
    ///
    /// # Errors
    ///
    /// Propagates auth and remote errors.
    pub async fn mark_as_played(&self, track: &Track) -> Result<()> {
        if !self.session.is_logged_in().await {
            debug!("Not logged in, skipping play report for {}", track.id);
            return Ok(());
        }
        let client = Arc::clone(&self.client);
        let video_id = track.id.clone();
        self.session
            .with_auth(|auth| async move { client.mark_watched(&auth, video_id).await })
            .await
    }
}

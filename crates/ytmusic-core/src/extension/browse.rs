//! Feeds, search, related shelves and radios.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{ALL_TAB_ID, YoutubeExtension};
use crate::convert::{ConvertContext, is_singles_layout, layout_to_shelf, to_media_item, to_track};
use crate::error::{Error, Result};
use crate::model::{
    Album, Artist, EXTRA_RELATED_ID, MediaItem, Playlist, QuickSearchItem, Radio, Shelf, Tab,
    Track, User,
};
use crate::paged::{Page, PagedData};
use crate::raw::RadioPage;
use crate::thumbnail::ThumbnailQuality;

const TRACK_REDIRECT_PREFIX: &str = "id://";
const RADIO_ID_PREFIX: &str = "radio_";

/// Pages a track radio serves before it stops following continuations.
pub const MAX_RADIO_PAGES: usize = 10;

fn radio_token(served: usize, cursor: &str) -> String {
    format!("{served}:{cursor}")
}

/// Pages served so far and the server cursor. A bare cursor counts as one page.
fn split_radio_token(token: &str) -> (usize, &str) {
    token
        .split_once(':')
        .and_then(|(n, cursor)| n.parse().ok().map(|n| (n, cursor)))
        .unwrap_or((1, token))
}

impl YoutubeExtension {
    /// Filter chips of the home feed.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn home_tabs(&self) -> Result<Vec<Tab>> {
        let feed = self.client.song_feed(None, None, None).await?;
        Ok(feed
            .filter_chips
            .iter()
            .map(|chip| Tab::new(chip.params.clone(), chip.text.display()))
            .collect())
    }

    /// The home feed, optionally filtered by a chip.
    #[must_use]
    pub fn home_feed(&self, tab: Option<&Tab>) -> PagedData<Shelf> {
        self.feed_source(tab.map(|t| t.id.clone()))
    }

    fn feed_source(&self, params: Option<String>) -> PagedData<Shelf> {
        let ext = self.clone();
        PagedData::continuous(move |token: Option<String>| {
            let ext = ext.clone();
            let params = params.clone();
            async move {
                let quality = ext.quality();
                let own = ext.own_channel_id().await;
                let feed = ext.client.song_feed(params, token, None).await?;
                let shelves = ext.layouts_to_shelves(&feed.layouts, quality, own.as_deref());
                Ok(Page::new(shelves, feed.continuation))
            }
        })
    }

    /// Search filter tabs for a query, or the feed chips without one.
    ///
    /// With a query the unfiltered results are remembered so that the
    /// following "All" feed read does not search again.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn search_tabs(&self, query: Option<&str>) -> Result<Vec<Tab>> {
        let Some(query) = query else {
            return self.home_tabs().await;
        };

        let results = self.client.search(query.to_string(), None).await?;
        let quality = self.quality();
        let own = self.own_channel_id().await;

        let layouts: Vec<_> = results
            .categories
            .iter()
            .map(|c| c.layout.clone())
            .collect();
        let shelves = self.layouts_to_shelves(&layouts, quality, own.as_deref());
        *self.memo.last_search.write().await = Some((query.to_string(), shelves));

        let mut tabs = vec![Tab::new(ALL_TAB_ID, ALL_TAB_ID)];
        tabs.extend(results.categories.iter().filter_map(|c| {
            let filter = c.filter.as_ref()?;
            let title = c.layout.title.as_ref().map_or("???", |t| t.display());
            Some(Tab::new(filter.params.clone(), title))
        }));
        Ok(tabs)
    }

    /// Search results, or a filtered feed when only a tab is given.
    #[must_use]
    pub fn search_feed(&self, query: Option<&str>, tab: Option<&Tab>) -> PagedData<Shelf> {
        match (query, tab) {
            (Some(query), _) => {
                let ext = self.clone();
                let query = query.to_string();
                let params = tab.map(|t| t.id.clone()).filter(|id| id != ALL_TAB_ID);
                PagedData::single(move || {
                    let ext = ext.clone();
                    let query = query.clone();
                    let params = params.clone();
                    async move { ext.search_shelves(query, params).await }
                })
            }
            (None, Some(tab)) => self.feed_source(Some(tab.id.clone())),
            (None, None) => PagedData::empty(),
        }
    }

    async fn search_shelves(&self, query: String, params: Option<String>) -> Result<Vec<Shelf>> {
        if params.is_none() {
            let memo = self.memo.last_search.read().await;
            if let Some((_, shelves)) = memo.as_ref().filter(|(q, _)| *q == query) {
                debug!("Reusing search results for {:?}", query);
                return Ok(shelves.clone());
            }
        }

        let results = self.client.search(query, params).await?;
        let quality = self.quality();
        let own = self.own_channel_id().await;
        let ctx = ConvertContext::new(quality).with_own_channel_id(own.as_deref());
        Ok(results
            .categories
            .iter()
            .flat_map(|c| c.layout.items.iter())
            .filter_map(|item| to_media_item(item, false, ctx))
            .map(Shelf::Item)
            .collect())
    }

    /// Suggestions for a partial query.
    ///
    /// Failures yield no suggestions.
    pub async fn quick_search(&self, query: Option<&str>) -> Vec<QuickSearchItem> {
        let Some(query) = query else {
            return Vec::new();
        };
        match self.client.search_suggestions(query.to_string()).await {
            Ok(suggestions) => suggestions
                .into_iter()
                .map(|s| QuickSearchItem {
                    query: s.text,
                    from_history: s.is_from_history,
                })
                .collect(),
            Err(e) => {
                warn!("Search suggestions failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Remove a query from the search history.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn delete_search_history(&self, item: &QuickSearchItem) -> Result<()> {
        self.client
            .delete_search_suggestion(item.query.clone())
            .await
    }

    /// Shelves related to a track.
    #[must_use]
    pub fn track_shelves(&self, track: &Track) -> PagedData<Shelf> {
        let ext = self.clone();
        let track = track.clone();
        PagedData::single(move || {
            let ext = ext.clone();
            let track = track.clone();
            async move { ext.related_shelves(&track).await }
        })
    }

    async fn related_shelves(&self, track: &Track) -> Result<Vec<Shelf>> {
        let related = track
            .extras
            .get(EXTRA_RELATED_ID)
            .ok_or_else(|| Error::not_found("No related id found."))?;
        let feed = self
            .client
            .song_feed(None, None, Some(related.clone()))
            .await?;
        let own = self.own_channel_id().await;
        Ok(self.layouts_to_shelves(&feed.layouts, self.quality(), own.as_deref()))
    }

    /// Shelves related to an album: those of its last track.
    #[must_use]
    pub fn album_shelves(&self, album: &Album) -> PagedData<Shelf> {
        let ext = self.clone();
        let album_id = album.id.clone();
        PagedData::single(move || {
            let ext = ext.clone();
            let album_id = album_id.clone();
            async move {
                let tracks = ext.load_tracks(&album_id).await?.load_all().await?;
                match tracks.last() {
                    Some(last) => {
                        let full = ext.load_track(last).await?;
                        ext.related_shelves(&full).await
                    }
                    None => Ok(Vec::new()),
                }
            }
        })
    }

    /// Shelves related to a playlist.
    ///
    /// A related id of the form `id://<track>` redirects to the categories
    /// related to that track.
    #[must_use]
    pub fn playlist_shelves(&self, playlist: &Playlist) -> PagedData<Shelf> {
        let ext = self.clone();
        let related = playlist.extras.get(EXTRA_RELATED_ID).cloned();
        PagedData::single(move || {
            let ext = ext.clone();
            let related = related.clone();
            async move {
                let related = related.ok_or_else(|| Error::not_found("No related id found."))?;
                if let Some(track_id) = related.strip_prefix(TRACK_REDIRECT_PREFIX) {
                    let track = ext.load_track(&Track::new(track_id, "")).await?;
                    let shelves = ext.related_shelves(&track).await?;
                    return Ok(shelves
                        .into_iter()
                        .filter(|s| matches!(s, Shelf::Category { .. }))
                        .collect());
                }
                let layouts = ext.client.related_from_playlist(related).await?;
                let own = ext.own_channel_id().await;
                Ok(ext.layouts_to_shelves(&layouts, ext.quality(), own.as_deref()))
            }
        })
    }

    /// Rows of an artist page, reusing the last loaded artist when it matches.
    #[must_use]
    pub fn artist_shelves(&self, artist: &Artist) -> PagedData<Shelf> {
        let ext = self.clone();
        let artist_id = artist.id.clone();
        PagedData::single(move || {
            let ext = ext.clone();
            let artist_id = artist_id.clone();
            async move { ext.artist_page_shelves(&artist_id).await }
        })
    }

    /// Rows of a user's channel page.
    #[must_use]
    pub fn user_shelves(&self, user: &User) -> PagedData<Shelf> {
        self.artist_shelves(&user.to_artist())
    }

    async fn artist_page_shelves(&self, artist_id: &str) -> Result<Vec<Shelf>> {
        let memo = self
            .memo
            .loaded_artist
            .read()
            .await
            .clone()
            .filter(|a| a.id == artist_id);
        let artist = match memo {
            Some(artist) => artist,
            None => self.client.load_artist(artist_id.to_string()).await?,
        };

        let quality = self.quality();
        let ctx = ConvertContext::new(quality);
        Ok(artist
            .layouts
            .iter()
            .flatten()
            .map(|layout| {
                let more = layout.view_more.clone().map(|view_more| {
                    let client = Arc::clone(&self.client);
                    let single = is_singles_layout(layout);
                    PagedData::single(move || {
                        let client = Arc::clone(&client);
                        let view_more = view_more.clone();
                        async move {
                            let rows = client.artist_more(view_more).await?;
                            let ctx = ConvertContext::new(quality);
                            Ok(rows
                                .iter()
                                .flat_map(|row| row.items.iter())
                                .filter_map(|item| to_media_item(item, single, ctx))
                                .collect::<Vec<MediaItem>>())
                        }
                    })
                });
                layout_to_shelf(layout, ctx, more)
            })
            .collect())
    }

    fn radio_tracks_of(page: &RadioPage, quality: ThumbnailQuality) -> Vec<Track> {
        page.items
            .iter()
            .map(|song| to_track(song, quality, None))
            .collect()
    }

    /// Radio seeded by a track; `continuation` resumes an earlier radio.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn track_radio(&self, track: &Track, continuation: Option<String>) -> Result<Radio> {
        let page = self
            .client
            .song_radio(track.id.clone(), continuation)
            .await?;
        Ok(Radio {
            id: format!("{RADIO_ID_PREFIX}{}", track.id),
            title: format!("{} Radio", track.title),
            tracks: Self::radio_tracks_of(&page, self.quality()),
            continuation: page.continuation,
        })
    }

    /// Radio seeded by an artist.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn artist_radio(&self, artist: &Artist) -> Result<Radio> {
        let page = self.client.artist_radio(artist.id.clone(), None).await?;
        Ok(Radio {
            id: format!("{RADIO_ID_PREFIX}{}", artist.id),
            title: format!("{} Radio", artist.name),
            tracks: Self::radio_tracks_of(&page, self.quality()),
            continuation: None,
        })
    }

    /// Radio seeded by a user's channel.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors.
    pub async fn user_radio(&self, user: &User) -> Result<Radio> {
        self.artist_radio(&user.to_artist()).await
    }

    /// Radio seeded by the last track of an album.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an empty album.
    pub async fn album_radio(&self, album: &Album) -> Result<Radio> {
        let page = self.client.load_playlist_page(album.id.clone(), None).await?;
        let last = page
            .entries
            .last()
            .map(|entry| to_track(&entry.song, ThumbnailQuality::High, None))
            .ok_or_else(|| Error::not_found("No tracks found"))?;
        self.track_radio(&last, None).await
    }

    /// Radio seeded by the last track of a loaded playlist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an empty playlist and
    /// [`Error::TrackListNotLoaded`] if the playlist was never loaded.
    pub async fn playlist_radio(&self, playlist: &Playlist) -> Result<Radio> {
        let tracks = self.load_tracks(&playlist.id).await?.load_all().await?;
        let last = tracks
            .last()
            .ok_or_else(|| Error::not_found("No tracks found"))?;
        self.track_radio(last, None).await
    }

    /// Tracks of a radio.
    ///
    /// Track radios with a continuation keep going for up to
    /// [`MAX_RADIO_PAGES`] pages. Page with
    /// [`load_first`](PagedData::load_first) and
    /// [`load_page`](PagedData::load_page) to fetch only what is played.
    #[must_use]
    pub fn radio_tracks(&self, radio: &Radio) -> PagedData<Track> {
        let seed = radio.id.strip_prefix(RADIO_ID_PREFIX).map(str::to_string);
        let (Some(seed), Some(first_token)) = (seed, radio.continuation.clone()) else {
            return PagedData::from_items(radio.tracks.clone());
        };

        let ext = self.clone();
        let first = radio.tracks.clone();
        PagedData::continuous(move |token: Option<String>| {
            let ext = ext.clone();
            let seed = seed.clone();
            let first = first.clone();
            let first_token = first_token.clone();
            async move {
                let Some(token) = token else {
                    return Ok(Page::new(first, Some(radio_token(1, &first_token))));
                };
                let (served, cursor) = split_radio_token(&token);
                let page = ext
                    .client
                    .song_radio(seed, Some(cursor.to_string()))
                    .await?;
                let served = served + 1;
                let next = match &page.continuation {
                    Some(cursor) if served < MAX_RADIO_PAGES => {
                        Some(radio_token(served, &cursor))
                    }
                    Some(_) => {
                        debug!("Radio stopped after {} pages", served);
                        None
                    }
                    None => None,
                };
                Ok(Page::new(Self::radio_tracks_of(&page, ext.quality()), next))
            }
        })
    }
}

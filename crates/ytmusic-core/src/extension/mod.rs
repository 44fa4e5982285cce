//! Host-facing facade.
//!
//! [`YoutubeExtension`] wires the catalog client, raw HTTP, host settings
//! and the [`Session`] together and exposes the operations a music host
//! calls. It is cheap to clone; clones share all state, which lets lazy
//! [`PagedData`] producers hold their own handle.
//!
//! Operations are grouped by concern:
//!
//! - [`browse`]: home, search and related feeds, radios
//! - [`track`]: full track loads, streams, lyrics
//! - [`library`]: containers, artists, the user library and playlist edits
//! - [`login`]: web-view login and account selection

mod browse;
mod library;
mod login;
mod track;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::Session;
use crate::client::{CatalogClient, HttpClient};
use crate::config::{ExtensionSettings, SettingSwitch, SettingsStore, setting_items};
use crate::convert::{ConvertContext, is_singles_layout, layout_to_shelf, to_media_item};
use crate::model::{MediaItem, Shelf};
use crate::paged::PagedData;
use crate::playlist_edit::PlaylistEditor;
use crate::raw::{RawArtist, RawLayout};
use crate::thumbnail::ThumbnailQuality;

pub use browse::MAX_RADIO_PAGES;
pub use library::LIBRARY_LANDING_ID;
pub use login::{LOGIN_INITIAL_URL, is_login_stop_url};

const MUSIC_BASE_URL: &str = "https://music.youtube.com";

/// Search params restricting results to songs.
pub const SONG_SEARCH_PARAMS: &str = "EgWKAQIIAWoSEAMQBBAJEA4QChAFEBEQEBAV";

/// Id of the unfiltered search tab.
pub const ALL_TAB_ID: &str = "All";

#[derive(Debug, Default)]
struct BrowseMemo {
    /// Last unfiltered search: query and its category shelves.
    last_search: RwLock<Option<(String, Vec<Shelf>)>>,
    /// Last fully loaded artist page.
    loaded_artist: RwLock<Option<RawArtist>>,
}

/// The extension.
#[derive(Clone)]
pub struct YoutubeExtension {
    client: Arc<dyn CatalogClient>,
    http: Arc<dyn HttpClient>,
    settings: Arc<dyn SettingsStore>,
    session: Arc<Session>,
    editor: PlaylistEditor,
    memo: Arc<BrowseMemo>,
}

impl std::fmt::Debug for YoutubeExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeExtension")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl YoutubeExtension {
    /// Create an extension with an anonymous session.
    pub fn new(
        client: Arc<dyn CatalogClient>,
        http: Arc<dyn HttpClient>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        let session = Arc::new(Session::new());
        Self {
            editor: PlaylistEditor::new(Arc::clone(&client), Arc::clone(&session)),
            client,
            http,
            settings,
            session,
            memo: Arc::new(BrowseMemo::default()),
        }
    }

    /// The switches the host should show.
    #[must_use]
    pub fn setting_items(&self) -> Vec<SettingSwitch> {
        setting_items()
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> ExtensionSettings {
        ExtensionSettings::from_store(self.settings.as_ref())
    }

    /// The session context.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn quality(&self) -> ThumbnailQuality {
        self.settings().thumbnail_quality()
    }

    async fn own_channel_id(&self) -> Option<String> {
        self.session
            .auth_state()
            .await
            .and_then(|state| state.own_channel_id)
    }

    /// Shelves for rows, each with its "view more" listing.
    fn layouts_to_shelves(
        &self,
        layouts: &[RawLayout],
        quality: ThumbnailQuality,
        own_channel_id: Option<&str>,
    ) -> Vec<Shelf> {
        let ctx = ConvertContext::new(quality).with_own_channel_id(own_channel_id);
        layouts
            .iter()
            .map(|layout| layout_to_shelf(layout, ctx, self.view_more_source(layout, quality)))
            .collect()
    }

    fn view_more_source(
        &self,
        layout: &RawLayout,
        quality: ThumbnailQuality,
    ) -> Option<PagedData<MediaItem>> {
        let browse_id = layout.view_more.as_ref()?.browse_id.clone()?;
        let single = is_singles_layout(layout);
        let client = Arc::clone(&self.client);
        Some(PagedData::single(move || {
            let client = Arc::clone(&client);
            let browse_id = browse_id.clone();
            async move {
                let items = client.view_more(browse_id).await?;
                let ctx = ConvertContext::new(quality);
                Ok(items
                    .iter()
                    .filter_map(|item| to_media_item(item, single, ctx))
                    .collect())
            }
        }))
    }
}

/// Public link to an item.
#[must_use]
pub fn share_url(item: &MediaItem) -> String {
    match item {
        MediaItem::Album(a) => format!("{MUSIC_BASE_URL}/browse/{}", a.id),
        MediaItem::Playlist(p) => format!("{MUSIC_BASE_URL}/playlist?list={}", p.id),
        MediaItem::Radio(r) => format!("{MUSIC_BASE_URL}/playlist?list={}", r.id),
        MediaItem::Artist(a) => format!("{MUSIC_BASE_URL}/channel/{}", a.id),
        MediaItem::User(u) => format!("{MUSIC_BASE_URL}/channel/{}", u.id),
        MediaItem::Track(t) => format!("{MUSIC_BASE_URL}/watch?v={}", t.id),
    }
}

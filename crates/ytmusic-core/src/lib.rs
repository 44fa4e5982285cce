//! `YouTube Music` extension core library
//!
//! This crate adapts the YouTube Music catalog to a generic music host:
//! - Normalization of catalog records into host entities
//! - Lazy single-shot and cursor-driven listings
//! - A session-scoped track-list cache for loaded albums and playlists
//! - Session-guarded calls that need a logged-in user
//! - Index-based playlist edits translated into remote actions
//! - HLS manifest and MP4 stream selection
//! - Web-view login and account switching
//!
//! The remote API is behind the [`CatalogClient`] trait; raw text fetches
//! (manifests, the account switcher) go through [`HttpClient`].
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result`]. Use [`Error::kind`] to
//! branch on the category, e.g. to prompt for login on
//! [`ErrorKind::Auth`].
//!
//! ```rust,ignore
//! use ytmusic_core::{ErrorKind, YoutubeExtension};
//!
//! match ext.library_feed(None).load_first().await {
//!     Ok(page) => show(page.items),
//!     Err(e) if e.kind() == ErrorKind::Auth => ask_for_login(),
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod account;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod extension;
pub mod logging;
pub mod model;
pub mod paged;
pub mod playlist_edit;
pub mod raw;
pub mod stream;
pub mod thumbnail;

pub use account::{ACCOUNT_SWITCHER_URL, fetch_account_users, parse_account_users};
pub use auth::{AuthHeaders, AuthState, Session, derive_auth_headers, derive_auth_headers_now};
pub use cache::TrackCache;
pub use client::{CatalogClient, HttpClient, LikeStatus, ReqwestHttpClient};
pub use config::{
    ExtensionSettings, KEY_HIGH_QUALITY, KEY_RESOLVE_MUSIC_FOR_VIDEOS, KEY_USE_MP4_FORMAT,
    KEY_VISITOR_ID, SettingSwitch, SettingsStore, setting_items,
};
pub use error::{Error, ErrorKind, Result};
pub use extension::{
    ALL_TAB_ID, LOGIN_INITIAL_URL, MAX_RADIO_PAGES, SONG_SEARCH_PARAMS, YoutubeExtension,
    is_login_stop_url, share_url,
};
pub use logging::{LogRotation, LoggingConfig, init_logging};
pub use model::{
    Album, Artist, Extras, ImageHolder, Lyric, Lyrics, MediaItem, MediaType, Playlist,
    QuickSearchItem, Radio, Shelf, StreamFormat, Streamable, Tab, Track, User,
};
pub use paged::{Page, PagedData};
pub use playlist_edit::{
    EditAction, PlaylistEditor, move_anchor_index, plan_additions, plan_insert_moves,
    plan_metadata, plan_move, plan_removals,
};
pub use stream::{is_music_asset, mp4_audio_streams, parse_hls_manifest};
pub use thumbnail::{ThumbnailProvider, ThumbnailQuality, resolve_cover};

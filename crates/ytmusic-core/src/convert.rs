//! Conversion of raw catalog records into domain entities.
//!
//! All functions here are pure and total: missing optional fields fall back
//! to defaults (`"Unknown"` names, absent descriptions) instead of failing.
//! The only records that produce nothing are unsupported kinds and the
//! synthetic liked-songs playlist.

use crate::model::{
    Album, Artist, EXTRA_ITEM_SET_IDS, EXTRA_LYRICS_ID, EXTRA_RELATED_ID, EXTRA_SET_ID,
    EXTRA_SUBSCRIBE_ID, Extras, MediaItem, Playlist, Shelf, Track, UNKNOWN_NAME, User,
};
use crate::paged::PagedData;
use crate::raw::{RawArtist, RawItem, RawLayout, RawPlaylist, RawSong};
use crate::thumbnail::{ThumbnailQuality, resolve_cover, song_cover};

/// Machine-readable title of the artist-page row holding single releases.
pub const SINGLES_TITLE: &str = "Singles";

/// Per-call conversion inputs.
#[derive(Debug, Clone, Copy)]
pub struct ConvertContext<'a> {
    /// Thumbnail tier for every cover in this conversion.
    pub quality: ThumbnailQuality,
    /// Channel id of the current session, used for playlist editability.
    pub own_channel_id: Option<&'a str>,
}

impl<'a> ConvertContext<'a> {
    /// Context for an anonymous session.
    #[must_use]
    pub const fn new(quality: ThumbnailQuality) -> Self {
        Self {
            quality,
            own_channel_id: None,
        }
    }

    /// Set the session's own channel id.
    #[must_use]
    pub const fn with_own_channel_id(mut self, own_channel_id: Option<&'a str>) -> Self {
        self.own_channel_id = own_channel_id;
        self
    }
}

fn name_or_unknown(name: Option<&String>) -> String {
    name.cloned().unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Whether a row holds single releases, judged on its locale-independent title.
#[must_use]
pub fn is_singles_layout(layout: &RawLayout) -> bool {
    layout
        .title
        .as_ref()
        .is_some_and(|title| title.raw == SINGLES_TITLE)
}

/// Convert a song record.
///
/// `set_id` is the per-playlist slot id when the song was loaded as part of
/// a playlist.
#[must_use]
pub fn to_track(song: &RawSong, quality: ThumbnailQuality, set_id: Option<&str>) -> Track {
    let album = song.album.as_ref().map(|a| to_album(a, false, quality));

    let mut extras = Extras::new();
    if let Some(related) = &song.related_browse_id {
        extras.insert(EXTRA_RELATED_ID.to_string(), related.clone());
    }
    if let Some(lyrics) = &song.lyrics_browse_id {
        extras.insert(EXTRA_LYRICS_ID.to_string(), lyrics.clone());
    }
    if let Some(set_id) = set_id {
        extras.insert(EXTRA_SET_ID.to_string(), set_id.to_string());
    }

    Track {
        id: song.id.clone(),
        title: name_or_unknown(song.name.as_ref()),
        artists: song
            .artists
            .iter()
            .flatten()
            .map(|a| to_artist(a, quality))
            .collect(),
        cover: Some(song_cover(
            &song.id,
            song.thumbnail_provider.as_ref(),
            quality,
        )),
        release_date: album.as_ref().and_then(|a| a.release_date.clone()),
        album,
        duration_ms: song.duration_ms,
        plays: None,
        liked: song.is_explicit,
        description: None,
        streamables: Vec::new(),
        extras,
    }
}

/// Convert an album-shaped record. Singles default to one track.
#[must_use]
pub fn to_album(playlist: &RawPlaylist, single: bool, quality: ThumbnailQuality) -> Album {
    let year = playlist.year.map(|y| y.to_string());
    Album {
        id: playlist.id.clone(),
        title: name_or_unknown(playlist.name.as_ref()),
        cover: resolve_cover(playlist.thumbnail_provider.as_ref(), quality, false),
        artists: playlist
            .artists
            .iter()
            .flatten()
            .map(|a| to_artist(a, quality))
            .collect(),
        track_count: playlist.item_count.or(if single { Some(1) } else { None }),
        release_date: year.clone(),
        duration_ms: playlist.total_duration_ms,
        description: playlist.description.clone(),
        subtitle: year,
    }
}

/// Convert a playlist-shaped record.
///
/// `related` is the related-shelves cursor returned with a playlist load.
#[must_use]
pub fn to_playlist(playlist: &RawPlaylist, ctx: ConvertContext<'_>, related: Option<&str>) -> Playlist {
    let mut extras = Extras::new();
    if let Some(related) = related {
        extras.insert(EXTRA_RELATED_ID.to_string(), related.to_string());
    }
    if let Some(set_ids) = &playlist.item_set_ids {
        extras.insert(EXTRA_ITEM_SET_IDS.to_string(), set_ids.join(","));
    }

    let year = playlist.year.map(|y| y.to_string());
    let subtitle = playlist
        .artists
        .as_ref()
        .map(|artists| {
            artists
                .iter()
                .map(|a| a.name.as_deref().unwrap_or(UNKNOWN_NAME))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .or_else(|| year.clone());

    Playlist {
        id: playlist.id.clone(),
        title: name_or_unknown(playlist.name.as_ref()),
        is_editable: is_owned_by(playlist.owner_id.as_deref(), ctx.own_channel_id),
        cover: resolve_cover(playlist.thumbnail_provider.as_ref(), ctx.quality, false),
        authors: playlist
            .artists
            .iter()
            .flatten()
            .map(|a| to_user(a, ctx.quality))
            .collect(),
        track_count: playlist.item_count,
        duration_ms: playlist.total_duration_ms,
        creation_date: year,
        description: playlist.description.clone(),
        subtitle,
        extras,
    }
}

/// True iff both ids are present and equal.
#[must_use]
pub fn is_owned_by(owner_id: Option<&str>, own_channel_id: Option<&str>) -> bool {
    matches!((owner_id, own_channel_id), (Some(owner), Some(own)) if owner == own)
}

/// Convert an artist record.
#[must_use]
pub fn to_artist(artist: &RawArtist, quality: ThumbnailQuality) -> Artist {
    let mut extras = Extras::new();
    if let Some(sub_id) = &artist.subscribe_channel_id {
        extras.insert(EXTRA_SUBSCRIBE_ID.to_string(), sub_id.clone());
    }
    Artist {
        id: artist.id.clone(),
        name: name_or_unknown(artist.name.as_ref()),
        cover: resolve_cover(artist.thumbnail_provider.as_ref(), quality, false),
        description: artist.description.clone(),
        followers: artist.subscriber_count,
        extras,
    }
}

/// Convert an artist record into a user.
#[must_use]
pub fn to_user(artist: &RawArtist, quality: ThumbnailQuality) -> User {
    User {
        id: artist.id.clone(),
        name: name_or_unknown(artist.name.as_ref()),
        cover: resolve_cover(artist.thumbnail_provider.as_ref(), quality, false),
        extras: Extras::new(),
    }
}

/// Project a user onto an artist.
#[must_use]
pub fn user_to_artist(user: &User) -> Artist {
    user.to_artist()
}

/// Convert any record into a presentable item.
///
/// Returns `None` for unsupported kinds and for the liked-songs playlist.
#[must_use]
pub fn to_media_item(item: &RawItem, single: bool, ctx: ConvertContext<'_>) -> Option<MediaItem> {
    match item {
        RawItem::Song(song) => Some(MediaItem::Track(to_track(song, ctx.quality, None))),
        RawItem::Playlist(playlist) if playlist.is_album() => {
            Some(MediaItem::Album(to_album(playlist, single, ctx.quality)))
        }
        RawItem::Playlist(playlist) if playlist.is_liked_songs() => None,
        RawItem::Playlist(playlist) => Some(MediaItem::Playlist(to_playlist(playlist, ctx, None))),
        RawItem::Artist(artist) => Some(MediaItem::Artist(to_artist(artist, ctx.quality))),
        RawItem::Unsupported => None,
    }
}

/// Convert a bulk playlist listing, dropping the liked-songs container.
#[must_use]
pub fn to_playlists(playlists: &[RawPlaylist], ctx: ConvertContext<'_>) -> Vec<Playlist> {
    playlists
        .iter()
        .filter(|p| !p.is_liked_songs())
        .map(|p| to_playlist(p, ctx, None))
        .collect()
}

/// Convert every item of a row, dropping those with no representation.
#[must_use]
pub fn layout_items(layout: &RawLayout, ctx: ConvertContext<'_>) -> Vec<MediaItem> {
    let single = is_singles_layout(layout);
    layout
        .items
        .iter()
        .filter_map(|item| to_media_item(item, single, ctx))
        .collect()
}

/// Convert a row into a category shelf.
///
/// `more` is the listing behind the row's "view more" link, built by the
/// caller since it needs the catalog client.
#[must_use]
pub fn layout_to_shelf(
    layout: &RawLayout,
    ctx: ConvertContext<'_>,
    more: Option<PagedData<MediaItem>>,
) -> Shelf {
    Shelf::Category {
        title: layout
            .title
            .as_ref()
            .map_or_else(|| UNKNOWN_NAME.to_string(), |t| t.display().to_string()),
        subtitle: layout.subtitle.as_ref().map(|s| s.display().to_string()),
        items: layout_items(layout, ctx),
        more,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::raw::{PlaylistType, UiString};
    use crate::thumbnail::ThumbnailProvider;

    const LOW: ThumbnailQuality = ThumbnailQuality::Low;

    fn song(id: &str) -> RawSong {
        RawSong {
            id: id.to_string(),
            ..RawSong::default()
        }
    }

    fn playlist(id: &str, owner: Option<&str>) -> RawPlaylist {
        RawPlaylist {
            id: id.to_string(),
            name: Some(format!("Playlist {id}")),
            owner_id: owner.map(str::to_string),
            ..RawPlaylist::default()
        }
    }

    #[test]
    fn test_track_without_name_is_unknown() {
        let track = to_track(&song("v1"), LOW, None);
        assert_eq!(track.title, "Unknown");
        assert!(track.artists.is_empty());
        assert!(track.extras.is_empty());
    }

    #[test]
    fn test_track_synthesized_cover() {
        let track = to_track(&song("v1"), ThumbnailQuality::High, None);
        let cover = track.cover.unwrap();
        assert_eq!(cover.url, "https://img.youtube.com/vi/v1/maxresdefault.jpg");
        assert!(cover.crop);
    }

    #[test]
    fn test_track_explicit_cover_and_extras() {
        let raw = RawSong {
            id: "v1".to_string(),
            name: Some("Song".to_string()),
            thumbnail_provider: Some(ThumbnailProvider::Fixed {
                low_url: Some("low".to_string()),
                high_url: Some("high".to_string()),
            }),
            related_browse_id: Some("MPTRt_1".to_string()),
            album: Some(RawPlaylist {
                id: "MPREb_1".to_string(),
                year: Some(2020),
                ..RawPlaylist::default()
            }),
            ..RawSong::default()
        };

        let track = to_track(&raw, LOW, Some("SET1"));

        assert_eq!(track.cover.as_ref().unwrap().url, "low");
        assert_eq!(track.extras.get(EXTRA_RELATED_ID).unwrap(), "MPTRt_1");
        assert!(!track.extras.contains_key(EXTRA_LYRICS_ID));
        assert_eq!(track.set_id(), Some("SET1"));
        assert_eq!(track.release_date.as_deref(), Some("2020"));
        assert_eq!(track.album.unwrap().title, "Unknown");
    }

    #[test]
    fn test_playlist_editability() {
        let cases = [
            (Some("UC1"), Some("UC1"), true),
            (Some("UC1"), Some("UC2"), false),
            (None, Some("UC1"), false),
            (Some("UC1"), None, false),
            (None, None, false),
        ];
        for (owner, own, expected) in cases {
            let ctx = ConvertContext::new(LOW).with_own_channel_id(own);
            let result = to_playlist(&playlist("PL1", owner), ctx, None);
            assert_eq!(result.is_editable, expected, "owner={owner:?} own={own:?}");
        }
    }

    #[test]
    fn test_playlist_subtitle_and_extras() {
        let mut raw = playlist("PL1", None);
        raw.artists = Some(vec![
            RawArtist {
                id: "UC1".to_string(),
                name: Some("A".to_string()),
                ..RawArtist::default()
            },
            RawArtist {
                id: "UC2".to_string(),
                ..RawArtist::default()
            },
        ]);
        raw.item_set_ids = Some(vec!["s1".to_string(), "s2".to_string()]);

        let result = to_playlist(&raw, ConvertContext::new(LOW), Some("rel"));

        assert_eq!(result.subtitle.as_deref(), Some("A, Unknown"));
        assert_eq!(result.authors.len(), 2);
        assert_eq!(result.extras.get(EXTRA_ITEM_SET_IDS).unwrap(), "s1,s2");
        assert_eq!(result.extras.get(EXTRA_RELATED_ID).unwrap(), "rel");
    }

    #[test]
    fn test_playlist_subtitle_falls_back_to_year() {
        let mut raw = playlist("PL1", None);
        raw.year = Some(1999);
        let result = to_playlist(&raw, ConvertContext::new(LOW), None);
        assert_eq!(result.subtitle.as_deref(), Some("1999"));
        assert!(result.extras.is_empty());
    }

    #[test]
    fn test_album_classification_and_singles() {
        let album = RawItem::Playlist(RawPlaylist {
            id: "MPREb_1".to_string(),
            playlist_type: Some(PlaylistType::Album),
            ..RawPlaylist::default()
        });
        let ctx = ConvertContext::new(LOW);

        match to_media_item(&album, true, ctx) {
            Some(MediaItem::Album(a)) => assert_eq!(a.track_count, Some(1)),
            other => panic!("expected album, got {other:?}"),
        }
        match to_media_item(&album, false, ctx) {
            Some(MediaItem::Album(a)) => assert_eq!(a.track_count, None),
            other => panic!("expected album, got {other:?}"),
        }
    }

    #[test]
    fn test_liked_songs_sentinel_dropped() {
        let ctx = ConvertContext::new(LOW);
        let sentinel = RawItem::Playlist(playlist("VLSE", None));
        assert!(to_media_item(&sentinel, false, ctx).is_none());

        let listed = to_playlists(&[playlist("PL1", None), playlist("VLSE", None)], ctx);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "PL1");
    }

    #[test]
    fn test_unsupported_item_dropped() {
        assert!(to_media_item(&RawItem::Unsupported, false, ConvertContext::new(LOW)).is_none());
    }

    #[test]
    fn test_singles_detection_ignores_localized_title() {
        let mut layout = RawLayout {
            title: Some(UiString {
                raw: "Singles".to_string(),
                localized: Some("Sencillos".to_string()),
            }),
            ..RawLayout::default()
        };
        assert!(is_singles_layout(&layout));

        layout.title = Some(UiString {
            raw: "Albums".to_string(),
            localized: Some("Singles".to_string()),
        });
        assert!(!is_singles_layout(&layout));
        assert!(!is_singles_layout(&RawLayout::default()));
    }

    #[test]
    fn test_layout_items_applies_singles_default() {
        let layout = RawLayout {
            title: Some(UiString::new("Singles")),
            items: vec![
                RawItem::Playlist(RawPlaylist {
                    id: "MPREb_1".to_string(),
                    playlist_type: Some(PlaylistType::Album),
                    ..RawPlaylist::default()
                }),
                RawItem::Unsupported,
                RawItem::Song(song("v1")),
            ],
            ..RawLayout::default()
        };

        let items = layout_items(&layout, ConvertContext::new(LOW));
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], MediaItem::Album(a) if a.track_count == Some(1)));
    }

    #[test]
    fn test_artist_and_user() {
        let raw = RawArtist {
            id: "UC1".to_string(),
            subscriber_count: Some(42),
            subscribe_channel_id: Some("UCsub".to_string()),
            ..RawArtist::default()
        };
        let artist = to_artist(&raw, LOW);
        assert_eq!(artist.name, "Unknown");
        assert_eq!(artist.followers, Some(42));
        assert_eq!(artist.extras.get(EXTRA_SUBSCRIBE_ID).unwrap(), "UCsub");

        let user = to_user(&raw, LOW);
        assert_eq!(user.id, "UC1");
        let back = user.to_artist();
        assert_eq!(back.id, user.id);
        assert_eq!(back.name, user.name);
    }

    #[tokio::test]
    async fn test_layout_to_shelf_uses_localized_title() {
        let layout = RawLayout {
            title: Some(UiString {
                raw: "Albums".to_string(),
                localized: Some("Alben".to_string()),
            }),
            items: vec![RawItem::Song(song("v1"))],
            ..RawLayout::default()
        };
        let more = PagedData::from_items(vec![MediaItem::Track(Track::new("v2", "Two"))]);

        match layout_to_shelf(&layout, ConvertContext::new(LOW), Some(more)) {
            Shelf::Category {
                title,
                subtitle,
                items,
                more,
            } => {
                assert_eq!(title, "Alben");
                assert!(subtitle.is_none());
                assert_eq!(items.len(), 1);
                let more = more.unwrap().load_all().await.unwrap();
                assert_eq!(more[0].id(), "v2");
            }
            Shelf::Item(_) => panic!("expected category"),
        }
    }

    #[test]
    fn test_untitled_layout_is_unknown() {
        let shelf = layout_to_shelf(&RawLayout::default(), ConvertContext::new(LOW), None);
        assert!(matches!(shelf, Shelf::Category { title, more: None, .. } if title == "Unknown"));
    }
}

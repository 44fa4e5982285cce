//! Integration tests for listings, normalization, playlist edit planning and
//! stream selection through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ytmusic_core::convert::{ConvertContext, layout_to_shelf, to_media_item};
use ytmusic_core::model::EXTRA_SET_ID;
use ytmusic_core::raw::{PlaylistType, RawItem, RawLayout, RawPlaylist, RawSong, UiString};
use ytmusic_core::{
    EditAction, Error, MediaItem, MediaType, Page, PagedData, Shelf, ThumbnailQuality, Track,
    parse_hls_manifest, plan_insert_moves, plan_move, plan_removals,
};

const MANIFEST: &str = "#EXTM3U
#EXT-X-MEDIA:URI=\"https://audio/234/index.m3u8\",TYPE=AUDIO,GROUP-ID=\"234\",NAME=\"Default\",DEFAULT=YES
#EXT-X-MEDIA:URI=\"https://audio/233/index.m3u8\",TYPE=AUDIO,GROUP-ID=\"233\",NAME=\"Default\",DEFAULT=YES
#EXT-X-STREAM-INF:BANDWIDTH=1000,CODECS=\"avc1\",RESOLUTION=640x360,FRAME-RATE=30
https://video/360/index.m3u8
";

fn slots(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| {
            let mut track = Track::new(format!("v{i}"), format!("Track {i}"));
            track
                .extras
                .insert(EXTRA_SET_ID.to_string(), format!("s{i}"));
            track
        })
        .collect()
}

fn paged_numbers(pages: usize, calls: Arc<AtomicUsize>) -> PagedData<usize> {
    PagedData::continuous(move |token: Option<String>| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let index: usize = token.as_deref().map_or(0, |t| t.parse().unwrap());
            let next = (index + 1 < pages).then(|| (index + 1).to_string());
            Ok(Page::new(vec![index * 10, index * 10 + 1], next))
        }
    })
}

#[tokio::test]
async fn test_continuous_listing_concatenates_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let listing = paged_numbers(3, Arc::clone(&calls));

    let items = listing.load_all().await.unwrap();
    assert_eq!(items, vec![0, 1, 10, 11, 20, 21]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_continuous_listing_resumes_from_cursor() {
    let listing = paged_numbers(2, Arc::new(AtomicUsize::new(0)));

    let first = listing.load_first().await.unwrap();
    let second = listing.load_page(first.continuation).await.unwrap();
    assert_eq!(second.items, vec![10, 11]);
    assert!(second.continuation.is_none());
}

#[tokio::test]
async fn test_single_listing_runs_once_and_retries_after_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let listing = PagedData::single(move || {
        let counter = Arc::clone(&counter);
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::network_error("offline"))
            } else {
                Ok(vec!["a", "b"])
            }
        }
    });

    assert!(listing.load_all().await.is_err());
    assert_eq!(listing.load_all().await.unwrap(), vec!["a", "b"]);
    assert_eq!(listing.clone().load_all().await.unwrap(), vec!["a", "b"]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_singles_row_marks_albums_as_singles() {
    let layout = RawLayout {
        title: Some(UiString::new("Singles")),
        items: vec![
            RawItem::Playlist(RawPlaylist {
                id: "MPREb_1".to_string(),
                playlist_type: Some(PlaylistType::Album),
                ..RawPlaylist::default()
            }),
            RawItem::Playlist(RawPlaylist {
                id: "VLSE".to_string(),
                ..RawPlaylist::default()
            }),
            RawItem::Song(RawSong {
                id: "v1".to_string(),
                ..RawSong::default()
            }),
        ],
        ..RawLayout::default()
    };

    let shelf = layout_to_shelf(&layout, ConvertContext::new(ThumbnailQuality::Low), None);
    let Shelf::Category { title, items, more, .. } = shelf else {
        panic!("expected category");
    };
    assert_eq!(title, "Singles");
    assert!(more.is_none());
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], MediaItem::Album(a) if a.track_count == Some(1)));
    assert!(matches!(&items[1], MediaItem::Track(t) if t.title == "Unknown"));
}

#[test]
fn test_unsupported_items_are_dropped() {
    let ctx = ConvertContext::new(ThumbnailQuality::High);
    assert!(to_media_item(&RawItem::Unsupported, false, ctx).is_none());
}

#[test]
fn test_removals_fail_before_sending_on_bad_index() {
    let tracks = slots(3);
    let err = plan_removals(&tracks, &[0, 5]).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let actions = plan_removals(&tracks, &[2, 0]).unwrap();
    assert_eq!(
        actions,
        vec![
            EditAction::Remove {
                video_id: "v2".to_string(),
                set_id: "s2".to_string(),
            },
            EditAction::Remove {
                video_id: "v0".to_string(),
                set_id: "s0".to_string(),
            },
        ]
    );
}

#[test]
fn test_insert_moves_share_one_anchor() {
    let tracks = slots(3);
    let added = vec!["n1".to_string(), "n2".to_string()];

    let moves = plan_insert_moves(&tracks, 1, &added).unwrap();
    assert!(moves.iter().all(|m| matches!(
        m,
        EditAction::Move { before_set_id, .. } if before_set_id == "s1"
    )));
    assert!(plan_insert_moves(&tracks, 3, &added).is_none());
}

#[test]
fn test_move_anchors() {
    let tracks = slots(4);

    let down = plan_move(&tracks, 0, 2).unwrap().unwrap();
    assert_eq!(
        down,
        EditAction::Move {
            set_id: "s0".to_string(),
            before_set_id: "s3".to_string(),
        }
    );

    let up = plan_move(&tracks, 3, 1).unwrap().unwrap();
    assert_eq!(
        up,
        EditAction::Move {
            set_id: "s3".to_string(),
            before_set_id: "s1".to_string(),
        }
    );

    assert!(plan_move(&tracks, 1, 3).unwrap().is_none());
}

#[test]
fn test_manifest_music_is_audio_only() {
    let music = parse_hls_manifest(MANIFEST, true);
    assert_eq!(music.len(), 2);
    assert!(music.iter().all(|s| s.media_type == MediaType::Audio));
    assert_eq!(music[0].quality, 234);

    let video = parse_hls_manifest(MANIFEST, false);
    assert_eq!(video.len(), 3);
    assert_eq!(video[2].media_type, MediaType::Video);
    assert_eq!(video[2].quality, 360);
    assert_eq!(video[2].url, "https://video/360/index.m3u8");
}

//! Full track loads, stream resolution and lyrics.

use std::sync::Arc;

use tracing::{debug, info};

use super::{SONG_SEARCH_PARAMS, YoutubeExtension};
use crate::convert::{ConvertContext, to_media_item, to_track};
use crate::error::{Error, Result};
use crate::model::{Artist, EXTRA_LYRICS_ID, Lyric, Lyrics, MediaItem, Streamable, Track};
use crate::paged::PagedData;
use crate::raw::RawVideo;
use crate::stream::{is_music_asset, mp4_audio_streams, parse_hls_manifest};

impl YoutubeExtension {
    /// Load a track with its playable streams.
    ///
    /// Song metadata and the player response are fetched concurrently.
    /// For generic videos, when enabled in settings, the metadata of the
    /// matching music track replaces the video's.
    ///
    /// # Errors
    ///
    /// Fails if either fetch fails, or if the player response has no HLS
    /// manifest while MP4 formats are off.
    pub async fn load_track(&self, track: &Track) -> Result<Track> {
        let settings = self.settings();
        let quality = settings.thumbnail_quality();

        let (song, video) = tokio::try_join!(
            self.client.load_song(track.id.clone()),
            self.client.get_video(track.id.clone()),
        )?;
        let mut loaded = to_track(&song, quality, None);

        let is_music = is_music_asset(video.details.music_video_type.as_deref());
        let streamables = if settings.use_mp4_format {
            mp4_audio_streams(&video.streaming_data.adaptive_formats)
        } else {
            self.hls_streams(&video, is_music).await?
        };

        let resolved = if settings.resolve_music_for_videos && !is_music {
            self.search_song_for_video(&loaded).await?
        } else {
            None
        };
        if let Some(music) = resolved {
            info!("Resolved video {} to music track {}", track.id, music.id);
            loaded = music;
        }

        Ok(finish_track(loaded, video, streamables))
    }

    async fn hls_streams(&self, video: &RawVideo, is_music: bool) -> Result<Vec<Streamable>> {
        let url = video
            .streaming_data
            .hls_manifest_url
            .as_deref()
            .ok_or_else(|| {
                Error::not_found(format!("No HLS manifest for {}", video.details.video_id))
            })?;
        let manifest = self.http.get_text(url, &[]).await?;
        Ok(parse_hls_manifest(&manifest, is_music))
    }

    /// Find the music track behind a generic video.
    ///
    /// Only the first song result is considered, and only when its title
    /// equals the video's exactly.
    async fn search_song_for_video(&self, track: &Track) -> Result<Option<Track>> {
        let artists = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let query = format!("{} {}", track.title, artists);
        let results = self
            .client
            .search(query, Some(SONG_SEARCH_PARAMS.to_string()))
            .await?;

        let quality = self.quality();
        let first = results
            .categories
            .first()
            .and_then(|c| c.layout.items.first())
            .and_then(|item| to_media_item(item, false, ConvertContext::new(quality)));
        let Some(MediaItem::Track(candidate)) = first else {
            return Ok(None);
        };
        if candidate.title != track.title {
            debug!(
                "First song result {:?} does not match {:?}",
                candidate.title, track.title
            );
            return Ok(None);
        }

        let song = self.client.load_song(candidate.id).await?;
        Ok(Some(to_track(&song, quality, None)))
    }

    /// Lyrics of a track, if it has any.
    #[must_use]
    pub fn track_lyrics(&self, track: &Track) -> PagedData<Lyrics> {
        let Some(lyrics_id) = track.extras.get(EXTRA_LYRICS_ID).cloned() else {
            return PagedData::empty();
        };
        let client = Arc::clone(&self.client);
        let title = track.title.clone();
        PagedData::single(move || {
            let client = Arc::clone(&client);
            let lyrics_id = lyrics_id.clone();
            let title = title.clone();
            async move {
                let Some(raw) = client.lyrics(lyrics_id.clone()).await? else {
                    return Ok(Vec::new());
                };
                let lines = raw
                    .lines
                    .into_iter()
                    .map(|l| Lyric {
                        text: l.text,
                        start_ms: l.start_ms,
                        end_ms: l.end_ms,
                    })
                    .collect();
                Ok(vec![Lyrics {
                    id: lyrics_id,
                    title,
                    source: raw.source,
                    lines,
                }])
            }
        })
    }
}

/// Merge the player response into loaded metadata.
fn finish_track(mut track: Track, video: RawVideo, streamables: Vec<Streamable>) -> Track {
    let details = video.details;
    if !details.video_id.is_empty() {
        track.id = details.video_id;
    }
    if track.artists.is_empty() {
        let author = details.author.unwrap_or_default();
        track.artists = details
            .channel_id
            .map(|channel_id| vec![Artist::new(channel_id, author)])
            .unwrap_or_default();
    }
    track.description = video.description;
    track.plays = details.view_count.and_then(|v| v.parse().ok());
    track.streamables = streamables;
    track
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::super::test_support::{FakeHttp, build, build_with_http, raw_song};
    use super::*;
    use crate::client::MockCatalogClient;
    use crate::config::tests::MemorySettings;
    use crate::config::{KEY_RESOLVE_MUSIC_FOR_VIDEOS, KEY_USE_MP4_FORMAT};
    use crate::model::MediaType;
    use crate::raw::{
        AdaptiveFormat, RawItem, RawLayout, RawLyricLine, RawLyrics, SearchCategory,
        SearchResults, StreamingData, VideoDetails,
    };

    const MANIFEST_URL: &str = "https://manifest/hls.m3u8";
    const MANIFEST: &str = "#EXTM3U\n\
#EXT-X-MEDIA:URI=\"https://cdn/a.m3u8\",TYPE=AUDIO,GROUP-ID=\"140\",NAME=\"Default\"\n\
#EXT-X-STREAM-INF:BANDWIDTH=1,RESOLUTION=640x360,AUDIO=\"140\"\n\
https://cdn/360.m3u8\n";

    fn video(id: &str, video_type: &str) -> RawVideo {
        RawVideo {
            details: VideoDetails {
                video_id: id.to_string(),
                title: Some("Song".to_string()),
                author: Some("Channel".to_string()),
                channel_id: Some("UCchan".to_string()),
                view_count: Some("1234".to_string()),
                music_video_type: Some(video_type.to_string()),
            },
            streaming_data: StreamingData {
                hls_manifest_url: Some(MANIFEST_URL.to_string()),
                adaptive_formats: vec![AdaptiveFormat {
                    url: Some("https://cdn/a.m4a".to_string()),
                    mime_type: "audio/mp4".to_string(),
                    bitrate: 128_000,
                }],
                expires_in_seconds: Some(21_540),
            },
            description: Some("desc".to_string()),
        }
    }

    fn http() -> Arc<FakeHttp> {
        Arc::new(FakeHttp::default().with(MANIFEST_URL, MANIFEST))
    }

    fn search_hit(id: &str, name: &str) -> SearchResults {
        SearchResults {
            categories: vec![SearchCategory {
                layout: RawLayout {
                    items: vec![RawItem::Song(raw_song(id, name))],
                    ..RawLayout::default()
                },
                filter: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_load_music_track_audio_only() {
        let mut client = MockCatalogClient::new();
        client
            .expect_load_song()
            .returning(|id| Ok(raw_song(&id, "Song")));
        client
            .expect_get_video()
            .returning(|id| Ok(video(&id, "MUSIC_VIDEO_TYPE_ATV")));
        client.expect_search().never();
        let ext = build_with_http(client, MemorySettings::default(), http());

        let track = ext.load_track(&Track::new("v1", "")).await.unwrap();

        assert_eq!(track.id, "v1");
        assert_eq!(track.streamables.len(), 1);
        assert_eq!(track.streamables[0].media_type, MediaType::Audio);
        assert_eq!(track.plays, Some(1234));
        assert_eq!(track.description.as_deref(), Some("desc"));
        assert_eq!(track.artists[0].id, "UCchan");
        assert_eq!(track.artists[0].name, "Channel");
    }

    #[tokio::test]
    async fn test_load_video_resolves_music() {
        let mut client = MockCatalogClient::new();
        client
            .expect_load_song()
            .withf(|id| id == "vid")
            .returning(|id| Ok(raw_song(&id, "Song")));
        client
            .expect_load_song()
            .withf(|id| id == "music")
            .returning(|id| {
                let mut song = raw_song(&id, "Song");
                song.lyrics_browse_id = Some("MPLY1".to_string());
                Ok(song)
            });
        client
            .expect_get_video()
            .returning(|id| Ok(video(&id, "MUSIC_VIDEO_TYPE_OMV")));
        client
            .expect_search()
            .withf(|q, params| q == "Song " && params.as_deref() == Some(SONG_SEARCH_PARAMS))
            .returning(|_, _| Ok(search_hit("music", "Song")));
        let ext = build_with_http(client, MemorySettings::default(), http());

        let track = ext.load_track(&Track::new("vid", "")).await.unwrap();

        assert_eq!(track.id, "vid");
        assert!(track.extras.contains_key(EXTRA_LYRICS_ID));
        assert_eq!(track.streamables.len(), 2);
        assert_eq!(track.streamables[1].media_type, MediaType::Video);
    }

    #[tokio::test]
    async fn test_title_mismatch_keeps_video_metadata() {
        let mut client = MockCatalogClient::new();
        client
            .expect_load_song()
            .times(1)
            .returning(|id| Ok(raw_song(&id, "Song (Official Video)")));
        client
            .expect_get_video()
            .returning(|id| Ok(video(&id, "MUSIC_VIDEO_TYPE_OMV")));
        client
            .expect_search()
            .returning(|_, _| Ok(search_hit("music", "Song")));
        let ext = build_with_http(client, MemorySettings::default(), http());

        let track = ext.load_track(&Track::new("vid", "")).await.unwrap();
        assert_eq!(track.title, "Song (Official Video)");
        assert!(!track.extras.contains_key(EXTRA_LYRICS_ID));
    }

    #[tokio::test]
    async fn test_mp4_setting_skips_manifest() {
        let mut client = MockCatalogClient::new();
        client
            .expect_load_song()
            .returning(|id| Ok(raw_song(&id, "Song")));
        client
            .expect_get_video()
            .returning(|id| Ok(video(&id, "MUSIC_VIDEO_TYPE_OMV")));
        let settings = MemorySettings::default()
            .with_bool(KEY_USE_MP4_FORMAT, true)
            .with_bool(KEY_RESOLVE_MUSIC_FOR_VIDEOS, false);
        let http = Arc::new(FakeHttp::default());
        let ext = build_with_http(client, settings, Arc::clone(&http));

        let track = ext.load_track(&Track::new("v1", "")).await.unwrap();

        assert_eq!(track.streamables.len(), 1);
        assert_eq!(track.streamables[0].quality, 128_000);
        assert!(http.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_track_propagates_first_failure() {
        let mut client = MockCatalogClient::new();
        client
            .expect_load_song()
            .returning(|_| Err(Error::remote(500, "boom")));
        client
            .expect_get_video()
            .returning(|id| Ok(video(&id, "MUSIC_VIDEO_TYPE_ATV")));
        let ext = build(client, MemorySettings::default());

        let err = ext.load_track(&Track::new("v1", "")).await.unwrap_err();
        assert!(matches!(err, Error::Remote { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_lyrics() {
        let mut client = MockCatalogClient::new();
        client.expect_lyrics().withf(|id| id == "MPLY1").returning(|_| {
            Ok(Some(RawLyrics {
                lines: vec![RawLyricLine {
                    text: "la".to_string(),
                    start_ms: 0,
                    end_ms: 900,
                }],
                source: Some("Source: LyricFind".to_string()),
            }))
        });
        let ext = build(client, MemorySettings::default());

        let mut track = Track::new("v1", "Song");
        assert!(ext.track_lyrics(&track).load_all().await.unwrap().is_empty());

        track
            .extras
            .insert(EXTRA_LYRICS_ID.to_string(), "MPLY1".to_string());
        let lyrics = ext.track_lyrics(&track).load_all().await.unwrap();
        assert_eq!(lyrics.len(), 1);
        assert_eq!(lyrics[0].title, "Song");
        assert_eq!(lyrics[0].lines[0].end_ms, 900);
    }
}

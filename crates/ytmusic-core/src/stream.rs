//! Playable stream resolution.
//!
//! Turns an already-fetched HLS master manifest, or the adaptive formats of a
//! player response, into [`Streamable`] variants. No network I/O happens here.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::model::{StreamFormat, Streamable};
use crate::raw::{AdaptiveFormat, MUSIC_VIDEO_TYPE_ATV};

static AUDIO_RENDITION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"#EXT-X-MEDIA:URI="(.*)",TYPE=AUDIO,GROUP-ID="(.*)",NAME"#).ok()
});

static VIDEO_VARIANT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"#EXT-X-STREAM-INF:.*,RESOLUTION=\d+x(\d+),.*\n(.*)").ok()
});

/// Whether a video is an official audio track rather than a generic video.
#[must_use]
pub fn is_music_asset(music_video_type: Option<&str>) -> bool {
    music_video_type == Some(MUSIC_VIDEO_TYPE_ATV)
}

/// Parse an HLS master manifest into playable variants.
///
/// Audio renditions come first, then video variants, each in declaration
/// order. For music assets only the audio renditions are returned. A group
/// id that is not a number yields quality 0.
#[must_use]
pub fn parse_hls_manifest(manifest: &str, is_music: bool) -> Vec<Streamable> {
    let (Some(audio_re), Some(video_re)) = (&*AUDIO_RENDITION_RE, &*VIDEO_VARIANT_RE) else {
        warn!("Manifest patterns failed to compile");
        return Vec::new();
    };

    let mut streams: Vec<Streamable> = audio_re
        .captures_iter(manifest)
        .map(|caps| {
            let url = caps[1].trim_end_matches('\r');
            let quality = caps[2].trim().parse().unwrap_or(0);
            Streamable::audio(url, quality, StreamFormat::Hls)
        })
        .collect();
    let audio_count = streams.len();

    if !is_music {
        streams.extend(video_re.captures_iter(manifest).map(|caps| {
            let height = caps[1].parse().unwrap_or(0);
            Streamable::video(caps[2].trim_end_matches('\r'), height, StreamFormat::Hls)
        }));
    }

    debug!(
        "Parsed manifest: {} audio, {} video (music: {})",
        audio_count,
        streams.len() - audio_count,
        is_music
    );
    streams
}

/// Select the progressive audio formats of a player response.
///
/// Formats without a direct URL are skipped. Quality is the bitrate.
#[must_use]
pub fn mp4_audio_streams(formats: &[AdaptiveFormat]) -> Vec<Streamable> {
    formats
        .iter()
        .filter(|f| f.mime_type.contains("audio"))
        .filter_map(|f| {
            f.url
                .as_ref()
                .map(|url| Streamable::audio(url.clone(), f.bitrate, StreamFormat::Progressive))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::MediaType;

    const MANIFEST: &str = "#EXTM3U\n\
#EXT-X-INDEPENDENT-SEGMENTS\n\
#EXT-X-MEDIA:URI=\"https://cdn/audio/234.m3u8\",TYPE=AUDIO,GROUP-ID=\"234\",NAME=\"Default\",DEFAULT=YES\n\
#EXT-X-STREAM-INF:BANDWIDTH=290000,CODECS=\"avc1\",RESOLUTION=256x144,FRAME-RATE=30,AUDIO=\"234\"\n\
https://cdn/video/144.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=1200000,CODECS=\"avc1\",RESOLUTION=1280x720,FRAME-RATE=30,AUDIO=\"234\"\n\
https://cdn/video/720.m3u8\n";

    #[test]
    fn test_music_asset_returns_audio_only() {
        let streams = parse_hls_manifest(MANIFEST, true);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].url, "https://cdn/audio/234.m3u8");
        assert_eq!(streams[0].quality, 234);
        assert_eq!(streams[0].media_type, MediaType::Audio);
        assert_eq!(streams[0].format, StreamFormat::Hls);
    }

    #[test]
    fn test_video_asset_returns_audio_then_video() {
        let streams = parse_hls_manifest(MANIFEST, false);
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].media_type, MediaType::Audio);
        assert_eq!(streams[1].url, "https://cdn/video/144.m3u8");
        assert_eq!(streams[1].quality, 144);
        assert_eq!(streams[2].url, "https://cdn/video/720.m3u8");
        assert_eq!(streams[2].quality, 720);
    }

    #[test]
    fn test_crlf_manifest() {
        let manifest = MANIFEST.replace('\n', "\r\n");
        let streams = parse_hls_manifest(&manifest, false);
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[2].url, "https://cdn/video/720.m3u8");
    }

    #[test]
    fn test_non_numeric_group_id() {
        let manifest =
            "#EXT-X-MEDIA:URI=\"https://cdn/a.m3u8\",TYPE=AUDIO,GROUP-ID=\"audio-hi\",NAME=\"x\"\n";
        let streams = parse_hls_manifest(manifest, true);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].quality, 0);
    }

    #[test]
    fn test_empty_manifest() {
        assert!(parse_hls_manifest("", false).is_empty());
    }

    #[test]
    fn test_is_music_asset() {
        assert!(is_music_asset(Some("MUSIC_VIDEO_TYPE_ATV")));
        assert!(!is_music_asset(Some("MUSIC_VIDEO_TYPE_OMV")));
        assert!(!is_music_asset(None));
    }

    #[test]
    fn test_mp4_audio_streams() {
        let formats = vec![
            AdaptiveFormat {
                url: Some("https://cdn/v.mp4".to_string()),
                mime_type: "video/mp4; codecs=\"avc1\"".to_string(),
                bitrate: 900_000,
            },
            AdaptiveFormat {
                url: Some("https://cdn/a.m4a".to_string()),
                mime_type: "audio/mp4; codecs=\"mp4a.40.2\"".to_string(),
                bitrate: 128_000,
            },
            AdaptiveFormat {
                url: None,
                mime_type: "audio/webm".to_string(),
                bitrate: 160_000,
            },
        ];

        let streams = mp4_audio_streams(&formats);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].quality, 128_000);
        assert_eq!(streams[0].format, StreamFormat::Progressive);
    }
}

//! Manifest model and the parsing boundary.
//!
//! The model is a tagged union: a *master* manifest carries the variant and
//! subtitle-track lists, a *media* manifest carries neither. Parsing
//! internals live behind [`ManifestParser`]; the default implementation maps
//! `hls_m3u8` types into the model.

use std::time::Duration;

use hls_m3u8::{
    MasterPlaylist as HlsMasterPlaylist, MediaPlaylist as HlsMediaPlaylist,
    tags::VariantStream as HlsVariantStream, types::MediaType,
};

use crate::{BuildError, BuildResult};

/// A fetched manifest. Immutable once parsed.
#[derive(Debug, Clone)]
pub enum Manifest {
    /// Master manifest with an ordered variant list.
    Master(MasterManifest),
    /// Media manifest; variant selection is skipped entirely.
    Media(MediaManifest),
}

impl Manifest {
    #[must_use]
    pub fn is_master(&self) -> bool {
        matches!(self, Self::Master(_))
    }

    #[must_use]
    pub fn master(&self) -> Option<&MasterManifest> {
        match self {
            Self::Master(master) => Some(master),
            Self::Media(_) => None,
        }
    }
}

/// Parsed master manifest.
#[derive(Debug, Clone)]
pub struct MasterManifest {
    /// Variants in the order they appear in the document.
    pub variants: Vec<Variant>,
    /// Embedded primary-format subtitle track descriptors. May be empty.
    pub subtitle_tracks: Vec<SubtitleTrack>,
}

/// Parsed media manifest.
#[derive(Debug, Clone)]
pub struct MediaManifest {
    pub segment_count: usize,
    pub target_duration: Option<Duration>,
    /// Whether the playlist carries an end marker (VOD or ended live).
    pub end_list: bool,
}

/// One bitrate/resolution/codec rendition, identified by its position in the
/// master manifest's variant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub index: usize,
    /// Media playlist URL, absolute or relative to the manifest URL.
    pub uri: String,
    pub bandwidth: Option<u64>,
    /// Raw `CODECS="..."` attribute, comma-separated.
    pub codecs: Option<String>,
    /// Advertised resolution as (width, height).
    pub resolution: Option<(u32, u32)>,
}

/// Descriptor of an embedded text track from the master manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub name: String,
    pub language: Option<String>,
    pub uri: Option<String>,
}

/// Parsing boundary: turns a fetched manifest body into the typed model.
pub trait ManifestParser: Send + Sync {
    fn parse(&self, data: &[u8]) -> BuildResult<Manifest>;
}

/// Default parser backed by `hls_m3u8`.
#[derive(Debug, Default, Clone, Copy)]
pub struct M3uParser;

impl ManifestParser for M3uParser {
    fn parse(&self, data: &[u8]) -> BuildResult<Manifest> {
        let input =
            std::str::from_utf8(data).map_err(|e| BuildError::ManifestParse(e.to_string()))?;

        if input.contains("#EXT-X-STREAM-INF") {
            parse_master(input).map(Manifest::Master)
        } else {
            parse_media(input).map(Manifest::Media)
        }
    }
}

fn parse_master(input: &str) -> BuildResult<MasterManifest> {
    let hls_master = HlsMasterPlaylist::try_from(input)
        .map_err(|e| BuildError::ManifestParse(e.to_string()))?
        .into_owned();

    // I-frame-only renditions are not playable variants; skipping them keeps
    // indices aligned with the selectable list.
    let variants = hls_master
        .variant_streams
        .iter()
        .filter_map(|vs| match vs {
            HlsVariantStream::ExtXStreamInf {
                uri, stream_data, ..
            } => {
                let resolution = stream_data
                    .resolution()
                    .map(|r| (r.width() as u32, r.height() as u32));
                Some((
                    uri.to_string(),
                    stream_data.bandwidth(),
                    stream_data.codecs().map(|c| c.to_string()),
                    resolution,
                ))
            }
            HlsVariantStream::ExtXIFrame { .. } => None,
        })
        .enumerate()
        .map(|(index, (uri, bandwidth, codecs, resolution))| Variant {
            index,
            uri,
            bandwidth: Some(bandwidth),
            codecs,
            resolution,
        })
        .collect();

    let subtitle_tracks = hls_master
        .media
        .iter()
        .filter(|media| media.media_type == MediaType::Subtitles)
        .map(|media| SubtitleTrack {
            name: media.name().to_string(),
            language: media.language().map(|l| l.to_string()),
            uri: media.uri().map(|u| u.to_string()),
        })
        .collect();

    Ok(MasterManifest {
        variants,
        subtitle_tracks,
    })
}

fn parse_media(input: &str) -> BuildResult<MediaManifest> {
    let hls_media = HlsMediaPlaylist::try_from(input)
        .map_err(|e| BuildError::ManifestParse(e.to_string()))?
        .into_owned();

    // `#EXT-X-ENDLIST` is the only reliable end-of-stream marker.
    let end_list = input.contains("#EXT-X-ENDLIST");

    Ok(MediaManifest {
        segment_count: hls_media.segments.values().count(),
        target_duration: Some(hls_media.target_duration),
        end_list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U\n\
        #EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID=\"subs\",NAME=\"English\",LANGUAGE=\"en\",URI=\"subs/en.m3u8\"\n\
        #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"\n\
        v0.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720,CODECS=\"avc1.640020,mp4a.40.2\"\n\
        v1.m3u8\n";

    const MEDIA: &str = "#EXTM3U\n\
        #EXT-X-TARGETDURATION:4\n\
        #EXT-X-MEDIA-SEQUENCE:0\n\
        #EXTINF:4.0,\n\
        seg0.ts\n\
        #EXTINF:4.0,\n\
        seg1.ts\n\
        #EXT-X-ENDLIST\n";

    #[test]
    fn master_manifest_yields_ordered_variants() {
        let manifest = M3uParser.parse(MASTER.as_bytes()).unwrap();
        let master = manifest.master().expect("master manifest");

        assert_eq!(master.variants.len(), 2);
        assert_eq!(master.variants[0].index, 0);
        assert_eq!(master.variants[0].uri, "v0.m3u8");
        assert_eq!(master.variants[0].bandwidth, Some(800_000));
        assert_eq!(master.variants[0].resolution, Some((640, 360)));
        assert_eq!(master.variants[1].index, 1);
        assert_eq!(master.variants[1].uri, "v1.m3u8");
    }

    #[test]
    fn master_manifest_yields_subtitle_tracks() {
        let manifest = M3uParser.parse(MASTER.as_bytes()).unwrap();
        let master = manifest.master().unwrap();

        assert_eq!(master.subtitle_tracks.len(), 1);
        let track = &master.subtitle_tracks[0];
        assert_eq!(track.name, "English");
        assert_eq!(track.language.as_deref(), Some("en"));
        assert_eq!(track.uri.as_deref(), Some("subs/en.m3u8"));
    }

    #[test]
    fn media_manifest_has_no_variants() {
        let manifest = M3uParser.parse(MEDIA.as_bytes()).unwrap();
        assert!(!manifest.is_master());
        assert!(manifest.master().is_none());

        match manifest {
            Manifest::Media(media) => {
                assert_eq!(media.segment_count, 2);
                assert!(media.end_list);
            }
            Manifest::Master(_) => panic!("expected media manifest"),
        }
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        let err = M3uParser.parse(b"not a playlist").unwrap_err();
        assert!(matches!(err, BuildError::ManifestParse(_)));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = M3uParser.parse(&[0xFF, 0xFE, 0x00]).unwrap_err();
        assert!(matches!(err, BuildError::ManifestParse(_)));
    }
}

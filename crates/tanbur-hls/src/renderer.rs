//! Renderer slots and the assembled renderer set.

use std::sync::Arc;

use crate::{
    error::{BuildError, BuildResult},
    source::SampleSource,
};

/// The four fixed pipeline slots, in hand-off order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    Video,
    Audio,
    Metadata,
    Text,
}

impl TrackType {
    pub const ALL: [TrackType; 4] = [
        TrackType::Video,
        TrackType::Audio,
        TrackType::Metadata,
        TrackType::Text,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Metadata => "metadata",
            Self::Text => "text",
        }
    }
}

/// One renderer: a track type bound to its sample feed.
///
/// Several renderers may share one sample source; the primary video, audio
/// and metadata renderers always do.
#[derive(Clone)]
pub struct Renderer {
    track: TrackType,
    source: Arc<SampleSource>,
}

impl Renderer {
    #[must_use]
    pub fn bind(track: TrackType, source: Arc<SampleSource>) -> Self {
        Self { track, source }
    }

    #[must_use]
    pub fn track(&self) -> TrackType {
        self.track
    }

    #[must_use]
    pub fn source(&self) -> &Arc<SampleSource> {
        &self.source
    }
}

/// The complete wired renderer set handed to the playback host.
pub struct RendererSet {
    video: Renderer,
    audio: Renderer,
    metadata: Renderer,
    text: Renderer,
}

impl std::fmt::Debug for RendererSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererSet")
            .field("video", &self.video.track())
            .field("audio", &self.audio.track())
            .field("metadata", &self.metadata.track())
            .field("text", &self.text.track())
            .finish_non_exhaustive()
    }
}

impl RendererSet {
    /// Assemble the set, checking each renderer sits in its own slot.
    pub fn new(
        video: Renderer,
        audio: Renderer,
        metadata: Renderer,
        text: Renderer,
    ) -> BuildResult<Self> {
        for (renderer, slot) in [
            (&video, TrackType::Video),
            (&audio, TrackType::Audio),
            (&metadata, TrackType::Metadata),
            (&text, TrackType::Text),
        ] {
            if renderer.track() != slot {
                return Err(BuildError::Construction(format!(
                    "renderer for {} placed in {} slot",
                    renderer.track().as_str(),
                    slot.as_str()
                )));
            }
        }
        Ok(Self {
            video,
            audio,
            metadata,
            text,
        })
    }

    #[must_use]
    pub fn get(&self, track: TrackType) -> &Renderer {
        match track {
            TrackType::Video => &self.video,
            TrackType::Audio => &self.audio,
            TrackType::Metadata => &self.metadata,
            TrackType::Text => &self.text,
        }
    }

    /// Renderers in hand-off order.
    pub fn tracks(&self) -> impl Iterator<Item = &Renderer> {
        TrackType::ALL.iter().map(|t| self.get(*t))
    }
}

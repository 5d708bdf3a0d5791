//! Data sources and sample sources for the assembled pipeline.
//!
//! A [`MeteredDataSource`] wraps the network client and feeds the build's
//! [`BandwidthMeter`] on every buffered transfer. On top of it sit the
//! sample sources: [`SampleSource::Chunked`] for segment-by-segment media
//! loading and [`SampleSource::Single`] for one-shot documents such as a
//! sidecar subtitle file.

use std::{
    sync::Arc,
    time::Instant,
};

use bytes::Bytes;
use tanbur_abr::{BandwidthMeter, ThroughputSampleSource};
use tanbur_net::{ByteStream, Headers, Net, NetError};
use tracing::{debug, trace};
use url::Url;

use crate::{
    error::{BuildError, BuildResult},
    parsing::Manifest,
};

/// Segment size unit for buffer accounting.
pub const BUFFER_SEGMENT_SIZE: usize = 64 * 1024;

/// Buffer budgets for the pipeline, expressed in segment units.
///
/// The primary (video/audio/metadata) pipeline gets a deep buffer; the text
/// pipeline only ever holds a couple of small documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadControl {
    pub buffer_segment_size: usize,
    pub main_buffer_segments: usize,
    pub text_buffer_segments: usize,
}

impl Default for LoadControl {
    fn default() -> Self {
        Self {
            buffer_segment_size: BUFFER_SEGMENT_SIZE,
            main_buffer_segments: 256,
            text_buffer_segments: 2,
        }
    }
}

impl LoadControl {
    #[must_use]
    pub fn main_buffer_bytes(&self) -> usize {
        self.buffer_segment_size * self.main_buffer_segments
    }

    #[must_use]
    pub fn text_buffer_bytes(&self) -> usize {
        self.buffer_segment_size * self.text_buffer_segments
    }
}

/// Network data source that reports every buffered transfer to the shared
/// bandwidth meter.
#[derive(Clone)]
pub struct MeteredDataSource {
    net: Arc<dyn Net>,
    meter: Arc<BandwidthMeter>,
    headers: Option<Headers>,
}

impl MeteredDataSource {
    pub fn new(net: Arc<dyn Net>, meter: Arc<BandwidthMeter>, headers: Option<Headers>) -> Self {
        Self {
            net,
            meter,
            headers,
        }
    }

    /// Fetch a whole resource into memory, recording the transfer.
    pub async fn get_bytes(&self, url: Url) -> Result<Bytes, NetError> {
        let started = Instant::now();
        let body = self.net.get_bytes(url, self.headers.clone()).await?;
        self.meter.record_transfer(
            body.len() as u64,
            started.elapsed(),
            ThroughputSampleSource::Network,
        );
        Ok(body)
    }

    /// Open a byte stream. Streamed transfers are not metered here; chunk
    /// timing belongs to whoever drains the stream.
    pub async fn stream(&self, url: Url) -> Result<ByteStream, NetError> {
        self.net.stream(url, self.headers.clone()).await
    }

    #[must_use]
    pub fn meter(&self) -> &Arc<BandwidthMeter> {
        &self.meter
    }
}

/// Which track-selection policy a chunk source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSelectorRole {
    /// Video/audio/metadata pipeline over the selected variants.
    Primary,
    /// Dedicated subtitle pipeline.
    Subtitle,
}

/// Segment-oriented source bound to a manifest and a variant subset.
pub struct ChunkSource {
    role: TrackSelectorRole,
    source: MeteredDataSource,
    manifest_url: Url,
    manifest: Arc<Manifest>,
    variants: Vec<usize>,
}

impl ChunkSource {
    pub fn primary(
        source: MeteredDataSource,
        manifest_url: Url,
        manifest: Arc<Manifest>,
        variants: Vec<usize>,
    ) -> Self {
        Self {
            role: TrackSelectorRole::Primary,
            source,
            manifest_url,
            manifest,
            variants,
        }
    }

    pub fn subtitle(source: MeteredDataSource, manifest_url: Url, manifest: Arc<Manifest>) -> Self {
        Self {
            role: TrackSelectorRole::Subtitle,
            source,
            manifest_url,
            manifest,
            // The subtitle pipeline never switches variants.
            variants: Vec::new(),
        }
    }

    #[must_use]
    pub fn role(&self) -> TrackSelectorRole {
        self.role
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[must_use]
    pub fn variants(&self) -> &[usize] {
        &self.variants
    }

    /// Open one segment relative to the manifest URL.
    pub async fn open_segment(&self, uri: &str) -> BuildResult<ByteStream> {
        let url = self
            .manifest_url
            .join(uri)
            .map_err(|e| BuildError::Construction(format!("segment url {uri:?}: {e}")))?;
        trace!(role = ?self.role, url = %url, "opening segment");
        Ok(self.source.stream(url).await?)
    }
}

/// Text payload format descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFormat {
    pub mime: String,
    pub language: Option<String>,
}

impl TextFormat {
    #[must_use]
    pub fn webvtt(language: Option<&str>) -> Self {
        Self {
            mime: "text/vtt".into(),
            language: language.map(String::from),
        }
    }
}

/// Chunked sample source: drains segments from a [`ChunkSource`] into a
/// bounded buffer.
pub struct ChunkedSampleSource {
    chunks: ChunkSource,
    buffer_bytes: usize,
}

impl std::fmt::Debug for ChunkedSampleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedSampleSource")
            .field("role", &self.chunks.role())
            .field("buffer_bytes", &self.buffer_bytes)
            .finish_non_exhaustive()
    }
}

impl ChunkedSampleSource {
    pub fn new(chunks: ChunkSource, buffer_bytes: usize) -> BuildResult<Self> {
        if buffer_bytes == 0 {
            return Err(BuildError::Construction(
                "sample buffer budget must be non-zero".into(),
            ));
        }
        debug!(role = ?chunks.role(), buffer_bytes, "chunked sample source");
        Ok(Self {
            chunks,
            buffer_bytes,
        })
    }

    #[must_use]
    pub fn buffer_bytes(&self) -> usize {
        self.buffer_bytes
    }

    #[must_use]
    pub fn chunks(&self) -> &ChunkSource {
        &self.chunks
    }
}

/// One-shot sample source for a single out-of-band document.
pub struct SingleSampleSource {
    url: Url,
    source: MeteredDataSource,
    format: TextFormat,
}

impl SingleSampleSource {
    pub fn new(url: Url, source: MeteredDataSource, format: TextFormat) -> Self {
        Self {
            url,
            source,
            format,
        }
    }

    #[must_use]
    pub fn format(&self) -> &TextFormat {
        &self.format
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Load the whole document.
    pub async fn load(&self) -> BuildResult<Bytes> {
        Ok(self.source.get_bytes(self.url.clone()).await?)
    }
}

/// A renderer's sample feed.
pub enum SampleSource {
    Chunked(ChunkedSampleSource),
    Single(SingleSampleSource),
}

impl SampleSource {
    #[must_use]
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Role of the underlying chunk source, if chunked.
    #[must_use]
    pub fn chunk_role(&self) -> Option<TrackSelectorRole> {
        match self {
            Self::Chunked(chunked) => Some(chunked.chunks().role()),
            Self::Single(_) => None,
        }
    }
}

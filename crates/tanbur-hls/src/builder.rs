//! Asynchronous renderer pipeline builder.
//!
//! [`HlsRendererBuilder`] is the entry point: each call to
//! [`HlsRendererBuilder::build_renderers`] spawns one build task that fetches
//! the manifest, selects variants, wires the four renderers and hands the
//! result to the [`PlaybackHost`]. Starting a new build cancels the previous
//! one; a canceled build never touches its host again.

use std::sync::Arc;

use tanbur_abr::BandwidthMeter;
use tanbur_net::{Headers, HttpClient, Net};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    capability::{CapabilityProbe, StaticProbe},
    error::{BuildError, BuildResult},
    events::{BuildEvent, EventEmitter},
    fetch::ManifestFetcher,
    options::BuildConfig,
    parsing::{M3uParser, Manifest, ManifestParser},
    renderer::{Renderer, RendererSet, TrackType},
    select::select_variants,
    source::{
        ChunkSource, ChunkedSampleSource, MeteredDataSource, SampleSource, SingleSampleSource,
        TextFormat,
    },
    subtitle::{TextSourceKind, resolve_text_source},
};

/// Receiver of build outcomes.
///
/// Exactly one of the two callbacks fires per build, unless the build is
/// canceled first, in which case neither does. Callbacks run on the build
/// task and must not block.
pub trait PlaybackHost: Send + Sync + 'static {
    /// The pipeline is wired; the meter is the one its data sources feed.
    fn on_renderers(&self, renderers: RendererSet, meter: Arc<BandwidthMeter>);

    /// The build failed. The error is the first failure, unretried.
    fn on_renderers_error(&self, error: BuildError);
}

/// Handle to one in-flight build. Cloneable; all clones control the same
/// build.
#[derive(Clone)]
pub struct BuildHandle {
    cancel: CancellationToken,
    done: CancellationToken,
}

impl BuildHandle {
    fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the build task has fully stopped, whatever the outcome.
    pub async fn finished(&self) {
        self.done.cancelled().await;
    }
}

/// Host notifier with at-most-once semantics, gated on cancellation.
struct Notifier {
    host: Arc<dyn PlaybackHost>,
    cancel: CancellationToken,
}

impl Notifier {
    fn complete(self, renderers: RendererSet, meter: Arc<BandwidthMeter>) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.host.on_renderers(renderers, meter);
    }

    fn fail(self, error: BuildError) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.host.on_renderers_error(error);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Idle,
    AwaitingManifest,
    Assembling,
    Canceled,
    Failed,
    Completed,
}

/// Builds HLS renderer pipelines, one build at a time.
pub struct HlsRendererBuilder {
    config: BuildConfig,
    net: Arc<dyn Net>,
    parser: Arc<dyn ManifestParser>,
    probe: Arc<dyn CapabilityProbe>,
    events: EventEmitter,
    current: Option<BuildHandle>,
}

impl HlsRendererBuilder {
    /// Builder with the default HTTP client, parser and capability probe.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        let net = Arc::new(HttpClient::new(config.net.clone())) as Arc<dyn Net>;
        Self::with_parts(
            config,
            net,
            Arc::new(M3uParser),
            Arc::new(StaticProbe::default()),
        )
    }

    /// Builder with injected seams.
    pub fn with_parts(
        config: BuildConfig,
        net: Arc<dyn Net>,
        parser: Arc<dyn ManifestParser>,
        probe: Arc<dyn CapabilityProbe>,
    ) -> Self {
        Self {
            config,
            net,
            parser,
            probe,
            events: EventEmitter::new(),
            current: None,
        }
    }

    /// Subscribe to build progress events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<BuildEvent> {
        self.events.subscribe()
    }

    /// Start an asynchronous build. Any in-flight build is canceled first.
    pub fn build_renderers(&mut self, host: Arc<dyn PlaybackHost>) -> BuildHandle {
        if let Some(previous) = self.current.take() {
            debug!("canceling previous build");
            previous.cancel();
        }

        let handle = BuildHandle::new();
        let mut task = AsyncRendererBuilder {
            config: self.config.clone(),
            net: Arc::clone(&self.net),
            parser: Arc::clone(&self.parser),
            probe: Arc::clone(&self.probe),
            events: self.events.clone(),
            cancel: handle.cancel.clone(),
            state: BuildState::Idle,
            host,
        };
        let done = handle.done.clone();
        tokio::spawn(async move {
            task.run().await;
            done.cancel();
        });

        self.current = Some(handle.clone());
        handle
    }

    /// Cancel the in-flight build, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }
}

/// One build task. Created per `build_renderers` call, dropped when done.
struct AsyncRendererBuilder {
    config: BuildConfig,
    net: Arc<dyn Net>,
    parser: Arc<dyn ManifestParser>,
    probe: Arc<dyn CapabilityProbe>,
    events: EventEmitter,
    cancel: CancellationToken,
    state: BuildState,
    host: Arc<dyn PlaybackHost>,
}

impl AsyncRendererBuilder {
    async fn run(&mut self) {
        let notifier = Notifier {
            host: Arc::clone(&self.host),
            cancel: self.cancel.clone(),
        };

        self.transition(BuildState::AwaitingManifest);
        let fetcher = ManifestFetcher::new(
            Arc::clone(&self.net),
            Arc::clone(&self.parser),
            self.config.url.clone(),
            &self.config.user_agent,
        );
        let fetched = fetcher.fetch().await;

        // The manifest fetch is the only suspension point; everything after
        // it runs to completion, so one check here covers the build.
        if self.cancel.is_cancelled() {
            self.transition(BuildState::Canceled);
            self.events.emit(BuildEvent::Canceled);
            return;
        }

        match fetched {
            Ok(manifest) => self.assemble(manifest, notifier),
            Err(error) => self.fail_build(notifier, error),
        }
    }

    fn assemble(&mut self, manifest: Manifest, notifier: Notifier) {
        self.transition(BuildState::Assembling);

        let (variants, subtitle_tracks) = match manifest.master() {
            Some(master) => (master.variants.len(), master.subtitle_tracks.len()),
            None => (0, 0),
        };
        self.events.emit(BuildEvent::ManifestLoaded {
            master: manifest.is_master(),
            variants,
            subtitle_tracks,
        });

        match self.wire(manifest) {
            Ok((renderers, meter)) => {
                self.transition(BuildState::Completed);
                self.events.emit(BuildEvent::Completed);
                notifier.complete(renderers, meter);
            }
            Err(error) => self.fail_build(notifier, error),
        }
    }

    /// Wire the full renderer set. Pure assembly, no suspension.
    fn wire(&self, manifest: Manifest) -> BuildResult<(RendererSet, Arc<BandwidthMeter>)> {
        let manifest = Arc::new(manifest);
        let meter = Arc::new(BandwidthMeter::new());
        let mut headers = Headers::new();
        headers.insert("User-Agent", &self.config.user_agent);
        let headers = Some(headers);

        let selected = match manifest.master() {
            Some(master) => {
                let capability = self.probe.query()?;
                let selected = select_variants(
                    &master.variants,
                    &capability,
                    self.config.allow_list.as_deref(),
                );
                if selected.is_empty() {
                    return Err(BuildError::NoEligibleVariant);
                }
                self.events.emit(BuildEvent::VariantsSelected {
                    indices: selected.clone(),
                });
                selected
            }
            // A media manifest has no variant list to filter.
            None => Vec::new(),
        };

        let primary_data =
            MeteredDataSource::new(Arc::clone(&self.net), Arc::clone(&meter), headers.clone());
        let primary_chunks = ChunkSource::primary(
            primary_data,
            self.config.url.clone(),
            Arc::clone(&manifest),
            selected,
        );
        let primary_source = Arc::new(SampleSource::Chunked(ChunkedSampleSource::new(
            primary_chunks,
            self.config.load_control.main_buffer_bytes(),
        )?));

        let video = Renderer::bind(TrackType::Video, Arc::clone(&primary_source));
        let audio = Renderer::bind(TrackType::Audio, Arc::clone(&primary_source));
        let metadata = Renderer::bind(TrackType::Metadata, Arc::clone(&primary_source));

        let kind = resolve_text_source(&manifest, self.config.sidecar_url.as_ref());
        self.events.emit(BuildEvent::TextSourceChosen { kind });

        let text_source = match kind {
            TextSourceKind::EmbeddedPrimary | TextSourceKind::Sidecar => {
                let text_data = MeteredDataSource::new(
                    Arc::clone(&self.net),
                    Arc::clone(&meter),
                    headers,
                );
                let text_chunks = ChunkSource::subtitle(
                    text_data.clone(),
                    self.config.url.clone(),
                    Arc::clone(&manifest),
                );
                // A sidecar document, when configured, supersedes the
                // chunked text pipeline even when the manifest declares
                // its own subtitle tracks.
                match &self.config.sidecar_url {
                    Some(url) => Arc::new(SampleSource::Single(SingleSampleSource::new(
                        url.clone(),
                        text_data,
                        TextFormat::webvtt(None),
                    ))),
                    None => Arc::new(SampleSource::Chunked(ChunkedSampleSource::new(
                        text_chunks,
                        self.config.load_control.text_buffer_bytes(),
                    )?)),
                }
            }
            // Captions ride in the primary stream; the text renderer shares
            // its source.
            TextSourceKind::EmbeddedLegacyCaption => Arc::clone(&primary_source),
        };
        let text = Renderer::bind(TrackType::Text, text_source);

        let renderers = RendererSet::new(video, audio, metadata, text)?;
        debug!(url = %self.config.url, "renderer set wired");
        Ok((renderers, meter))
    }

    fn fail_build(&mut self, notifier: Notifier, error: BuildError) {
        warn!(url = %self.config.url, error = %error, "build failed");
        self.transition(BuildState::Failed);
        self.events.emit(BuildEvent::Failed {
            error: error.to_string(),
        });
        notifier.fail(error);
    }

    fn transition(&mut self, next: BuildState) {
        trace!(from = ?self.state, to = ?next, "build state");
        self.state = next;
    }
}

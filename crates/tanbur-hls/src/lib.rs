#![forbid(unsafe_code)]

// Internal modules (exposed for advanced usage and testing)
pub mod builder;
pub mod capability;
pub mod error;
pub mod events;
pub mod fetch;
pub mod options;
pub mod parsing;
pub mod renderer;
pub mod select;
pub mod source;
pub mod subtitle;

// ============================================================================
// Primary public API
// ============================================================================
pub use builder::{BuildHandle, HlsRendererBuilder, PlaybackHost};
pub use tanbur_abr::BandwidthMeter;
pub use error::{BuildError, BuildResult};
pub use options::BuildConfig;
pub use renderer::{Renderer, RendererSet, TrackType};

// ============================================================================
// Advanced types (selection policy, events, parser/probe seams)
// ============================================================================
pub use capability::{CapabilityError, CapabilityProbe, DisplayCapability, StaticProbe};
pub use events::BuildEvent;
pub use fetch::ManifestFetcher;
pub use parsing::{
    M3uParser, Manifest, ManifestParser, MasterManifest, MediaManifest, SubtitleTrack, Variant,
};
pub use select::select_variants;
pub use source::{
    ChunkSource, ChunkedSampleSource, LoadControl, MeteredDataSource, SampleSource,
    SingleSampleSource, TextFormat, TrackSelectorRole,
};
pub use subtitle::{TextSourceKind, resolve_text_source};

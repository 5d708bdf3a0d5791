//! Text source selection policy.

use url::Url;

use crate::parsing::Manifest;

/// Where the text renderer gets its samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSourceKind {
    /// WebVTT tracks declared in the master manifest.
    EmbeddedPrimary,
    /// Caller-supplied out-of-band WebVTT document.
    Sidecar,
    /// No dedicated text media; captions ride inside the primary stream
    /// (CEA-608 style).
    EmbeddedLegacyCaption,
}

/// Pick the text source for a build.
///
/// Priority order: embedded manifest subtitle tracks beat a sidecar URL,
/// which beats falling back to in-stream captions. A media manifest never
/// declares subtitle tracks, so it can only yield the latter two.
#[must_use]
pub fn resolve_text_source(manifest: &Manifest, sidecar_url: Option<&Url>) -> TextSourceKind {
    match manifest {
        Manifest::Master(master) if !master.subtitle_tracks.is_empty() => {
            TextSourceKind::EmbeddedPrimary
        }
        _ if sidecar_url.is_some() => TextSourceKind::Sidecar,
        _ => TextSourceKind::EmbeddedLegacyCaption,
    }
}

//! Display capability probing.
//!
//! Variant filtering needs to know what the output device can decode and
//! display. The probe is a seam: production code plugs in whatever platform
//! query it has, tests plug in a [`StaticProbe`].

use thiserror::Error;

/// The capability query itself failed (as opposed to reporting limits).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CapabilityError(pub String);

/// Answers "what can this device decode and display".
///
/// The query is synchronous and runs once per build, after the manifest
/// arrives and before variant selection.
pub trait CapabilityProbe: Send + Sync {
    fn query(&self) -> Result<DisplayCapability, CapabilityError>;
}

/// Decode/display limits reported by a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCapability {
    pub max_width: u32,
    pub max_height: u32,
    /// Supported codec families, compared against the family prefix of each
    /// RFC 6381 codec string ("avc1.64001f" matches family "avc1").
    pub supported_codecs: Vec<String>,
}

impl DisplayCapability {
    /// Whether every codec in a comma-separated `CODECS` attribute is
    /// supported.
    #[must_use]
    pub fn supports_codecs(&self, codecs: &str) -> bool {
        codecs
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .all(|codec| {
                let family = codec.split('.').next().unwrap_or(codec);
                self.supported_codecs
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(family))
            })
    }

    #[must_use]
    pub fn supports_resolution(&self, width: u32, height: u32) -> bool {
        width <= self.max_width && height <= self.max_height
    }
}

impl Default for DisplayCapability {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            supported_codecs: ["avc1", "mp4a", "hev1", "hvc1", "ac-3", "ec-3"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Probe returning a fixed capability. The production default assumes a
/// 1080p AVC/AAC-capable device.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe(pub DisplayCapability);

impl CapabilityProbe for StaticProbe {
    fn query(&self) -> Result<DisplayCapability, CapabilityError> {
        Ok(self.0.clone())
    }
}

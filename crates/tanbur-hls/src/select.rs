//! Variant eligibility filtering.

use tracing::debug;

use crate::{capability::DisplayCapability, parsing::Variant};

/// Filter a master manifest's variant list down to the playable subset.
///
/// Three order-preserving filters apply in sequence: an optional caller
/// allow-list of variant indices, codec support, and resolution fit. A
/// variant that advertises no codecs or no resolution passes the
/// corresponding filter; only explicit mismatches exclude. Returns the
/// surviving indices in manifest order, possibly empty.
#[must_use]
pub fn select_variants(
    variants: &[Variant],
    capability: &DisplayCapability,
    allow_list: Option<&[usize]>,
) -> Vec<usize> {
    let selected: Vec<usize> = variants
        .iter()
        .filter(|v| allow_list.is_none_or(|allowed| allowed.contains(&v.index)))
        .filter(|v| {
            v.codecs
                .as_deref()
                .is_none_or(|codecs| capability.supports_codecs(codecs))
        })
        .filter(|v| {
            v.resolution
                .is_none_or(|(w, h)| capability.supports_resolution(w, h))
        })
        .map(|v| v.index)
        .collect();

    debug!(
        total = variants.len(),
        selected = selected.len(),
        "variant selection"
    );
    selected
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn variant(index: usize, codecs: Option<&str>, resolution: Option<(u32, u32)>) -> Variant {
        Variant {
            index,
            uri: format!("v{index}.m3u8"),
            bandwidth: Some(1_000_000),
            codecs: codecs.map(String::from),
            resolution,
        }
    }

    fn capability() -> DisplayCapability {
        DisplayCapability::default()
    }

    #[test]
    fn keeps_manifest_order() {
        let variants = vec![
            variant(0, Some("avc1.4d401e"), Some((640, 360))),
            variant(1, Some("avc1.640020"), Some((1280, 720))),
            variant(2, Some("avc1.640028"), Some((1920, 1080))),
        ];
        assert_eq!(
            select_variants(&variants, &capability(), None),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn drops_unsupported_codec_families() {
        let variants = vec![
            variant(0, Some("dvh1.05.06"), Some((1920, 1080))),
            variant(1, Some("avc1.640020"), Some((1280, 720))),
        ];
        assert_eq!(select_variants(&variants, &capability(), None), vec![1]);
    }

    #[test]
    fn drops_oversize_resolutions() {
        let variants = vec![
            variant(0, Some("avc1.640028"), Some((3840, 2160))),
            variant(1, Some("avc1.640020"), Some((1280, 720))),
        ];
        assert_eq!(select_variants(&variants, &capability(), None), vec![1]);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("avc1.4d401e"), None)]
    #[case(None, Some((640, 360)))]
    fn missing_metadata_passes(
        #[case] codecs: Option<&str>,
        #[case] resolution: Option<(u32, u32)>,
    ) {
        let variants = vec![variant(0, codecs, resolution)];
        assert_eq!(select_variants(&variants, &capability(), None), vec![0]);
    }

    #[test]
    fn allow_list_restricts_candidates() {
        let variants = vec![
            variant(0, Some("avc1.4d401e"), Some((640, 360))),
            variant(1, Some("avc1.640020"), Some((1280, 720))),
            variant(2, Some("avc1.640028"), Some((1920, 1080))),
        ];
        assert_eq!(
            select_variants(&variants, &capability(), Some(&[2, 0])),
            vec![0, 2]
        );
    }

    #[test]
    fn can_select_nothing() {
        let variants = vec![variant(0, Some("dvh1.05.06"), None)];
        assert!(select_variants(&variants, &capability(), None).is_empty());
    }
}

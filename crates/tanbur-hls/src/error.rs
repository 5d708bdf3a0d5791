use thiserror::Error;

use crate::capability::CapabilityError;

/// Pipeline build errors.
///
/// None of these are retried internally; each one short-circuits the
/// remaining assembly steps and is surfaced verbatim to the playback host.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("manifest fetch failed: {0}")]
    ManifestFetch(#[from] tanbur_net::NetError),

    #[error("manifest parse failed: {0}")]
    ManifestParse(String),

    #[error("capability query failed: {0}")]
    CapabilityQuery(String),

    #[error("no eligible variant after filtering")]
    NoEligibleVariant,

    #[error("pipeline construction failed: {0}")]
    Construction(String),
}

impl From<CapabilityError> for BuildError {
    fn from(err: CapabilityError) -> Self {
        Self::CapabilityQuery(err.to_string())
    }
}

pub type BuildResult<T> = Result<T, BuildError>;

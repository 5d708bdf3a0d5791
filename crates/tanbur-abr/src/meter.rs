use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::trace;

use crate::{
    estimator::{Estimator, ThroughputEstimator},
    types::{ThroughputSample, ThroughputSampleSource},
};

/// Shared bandwidth meter.
///
/// One instance is created per pipeline build and cloned (via `Arc`) into
/// every data source of that build; the playback host receives the same
/// instance on completion so later policy layers observe the same estimate
/// the pipelines feed.
pub struct BandwidthMeter<E = ThroughputEstimator> {
    inner: RwLock<E>,
}

impl BandwidthMeter<ThroughputEstimator> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_estimator(ThroughputEstimator::new())
    }
}

impl Default for BandwidthMeter<ThroughputEstimator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Estimator> BandwidthMeter<E> {
    pub fn with_estimator(estimator: E) -> Self {
        Self {
            inner: RwLock::new(estimator),
        }
    }

    /// Record a raw sample.
    pub fn record(&self, sample: ThroughputSample) {
        self.inner.write().push_sample(sample);
    }

    /// Record a completed transfer observed by a data source.
    pub fn record_transfer(&self, bytes: u64, elapsed: Duration, source: ThroughputSampleSource) {
        trace!(bytes, ?elapsed, ?source, "bandwidth sample");
        self.record(ThroughputSample {
            bytes,
            duration: elapsed,
            at: Instant::now(),
            source,
        });
    }

    /// Current estimate in bits per second, if any samples qualified.
    pub fn estimate_bps(&self) -> Option<u64> {
        self.inner.read().estimate_bps()
    }
}

use std::time::{Duration, Instant};

/// Where the bytes of a sample came from.
///
/// Only network transfers say anything about link capacity; cache reads are
/// recorded for bookkeeping but ignored by the estimator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThroughputSampleSource {
    Network,
    Cache,
}

/// One observed transfer.
#[derive(Clone, Copy, Debug)]
pub struct ThroughputSample {
    pub bytes: u64,
    pub duration: Duration,
    pub at: Instant,
    pub source: ThroughputSampleSource,
}

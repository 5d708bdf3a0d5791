//! Network throughput estimation for adaptive playback.
//!
//! One [`BandwidthMeter`] is constructed per pipeline build and shared
//! (read-mostly) by every track pipeline of that build. Bitrate *decision*
//! heuristics are deliberately out of scope; consumers plug their own policy
//! on top of the [`Estimator`] estimates.

#![forbid(unsafe_code)]

mod estimator;
mod meter;
mod types;

pub use estimator::{Estimator, ThroughputEstimator};
pub use meter::BandwidthMeter;
pub use types::{ThroughputSample, ThroughputSampleSource};

use std::time::Duration;

/// Tunable timing and retry bounds for the submission protocol.
///
/// The defaults are the product's fixed contract: a bounded
/// availability wait of 10 attempts at 800 ms, up to 10 thumbnail
/// attempts, and a fixed 7-second status poll with no backoff or
/// jitter. Tests tighten the durations without changing the bounds.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Maximum GET attempts while waiting for the uploaded video to be
    /// linked to its lesson.
    pub availability_attempts: u32,
    /// Fixed delay between availability attempts.
    pub availability_delay: Duration,
    /// Maximum thumbnail upload attempts (each not-ready failure costs
    /// one attempt and re-runs the availability wait).
    pub thumbnail_attempts: u32,
    /// Fixed interval between status polls.
    pub poll_interval: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            availability_attempts: 10,
            availability_delay: Duration::from_millis(800),
            thumbnail_attempts: 10,
            poll_interval: Duration::from_millis(7000),
        }
    }
}

//! Per-block aggregate statistics.

use std::time::Duration;

use crate::format::duration_as_ms;

/// Statistics accumulated for a single named block inside the recorder.
#[derive(Clone, Debug)]
pub(crate) struct BlockStats {
    /// Total elapsed time across all completed timings of this block.
    pub(crate) total: Duration,

    /// Number of completed timings of this block.
    pub(crate) count: u64,

    /// Position in which this block first completed a timing, relative to the
    /// other blocks. Reports use this as the tie-breaker when two blocks have
    /// the same total.
    pub(crate) discovered: usize,
}

impl BlockStats {
    pub(crate) fn new(discovered: usize) -> Self {
        Self {
            total: Duration::ZERO,
            count: 0,
            discovered,
        }
    }

    /// Adds one completed timing to the statistics.
    pub(crate) fn add(&mut self, elapsed: Duration) {
        self.total = self.total.checked_add(elapsed).expect(
            "elapsed time accumulation overflows Duration - this indicates an unrealistic scenario",
        );

        self.count = self.count.checked_add(1).expect(
            "completed timing count overflows u64 - this indicates an unrealistic scenario",
        );
    }
}

/// Point-in-time summary of one named block, as returned by
/// [`Recorder::stats()`](crate::Recorder::stats).
#[derive(Clone, Debug)]
pub struct BlockSummary {
    total: Duration,
    count: u64,
}

impl BlockSummary {
    pub(crate) fn new(total: Duration, count: u64) -> Self {
        Self { total, count }
    }

    /// Total elapsed time across all completed timings of this block.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of completed timings of this block.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean elapsed time per completed timing, in milliseconds.
    ///
    /// Returns zero if no timings have completed.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "timing counts are far below the precision limit of f64"
    )]
    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            duration_as_ms(self.total) / self.count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_stats_start_at_zero() {
        let stats = BlockStats::new(0);
        assert_eq!(stats.total, Duration::ZERO);
        assert_eq!(stats.count, 0);
    }

    #[test]
    fn block_stats_accumulate() {
        let mut stats = BlockStats::new(3);

        stats.add(Duration::from_millis(100));
        stats.add(Duration::from_millis(200));

        assert_eq!(stats.total, Duration::from_millis(300));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.discovered, 3);
    }

    #[test]
    fn summary_average_is_total_over_count() {
        let summary = BlockSummary::new(Duration::from_millis(300), 3);
        assert_eq!(summary.average_ms(), 100.0);
    }

    #[test]
    fn summary_average_of_nothing_is_zero() {
        let summary = BlockSummary::new(Duration::ZERO, 0);
        assert_eq!(summary.average_ms(), 0.0);
    }
}

//! Metrics for batch dispatch.

use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// Metrics for a [`Multicall`](crate::multicall::Multicall) batcher, labelled by execution mode.
#[derive(Metrics, Clone)]
#[metrics(scope = "multicall")]
pub struct MulticallMetrics {
    /// Number of dispatched batches.
    pub batches: Counter,
    /// Number of sub-calls that failed inside an executed batch.
    pub failed_calls: Counter,
    /// Number of batches that could not be executed.
    pub batch_errors: Counter,
    /// Number of calls per batch.
    pub batch_size: Histogram,
}

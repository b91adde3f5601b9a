//! Progress reporting for chunked aggregation and ranking runs.

use tokio::sync::mpsc;

/// Progress information for a chunked run
#[derive(Debug, Clone)]
pub struct AggregationProgress {
    /// Current stage.
    pub stage: AggregationStage,
    /// Items handled so far.
    pub processed: usize,
    /// Items in the run.
    pub total: usize,
    /// Fraction complete.
    pub progress: f32, // 0.0 to 1.0
    /// Human readable status.
    pub message: String,
}

/// Stages of a chunked run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AggregationStage {
    Initializing,
    Processing,
    Finalizing,
    Complete,
}

/// Sending half of a progress channel.
pub type ProgressSender = mpsc::UnboundedSender<AggregationProgress>;

/// Send a progress update if a receiver was supplied.
///
/// A dropped receiver is not an error; the run continues silently.
pub(crate) fn send_progress(
    progress_tx: Option<&ProgressSender>,
    stage: AggregationStage,
    processed: usize,
    total: usize,
    message: impl Into<String>,
) {
    if let Some(tx) = progress_tx {
        #[allow(clippy::cast_precision_loss)]
        let progress = if total > 0 { processed as f32 / total as f32 } else { 1.0 };
        let _ = tx.send(AggregationProgress {
            stage,
            processed,
            total,
            progress,
            message: message.into(),
        });
    }
}

/// Validate a chunk size supplied to a chunked run.
pub(crate) fn check_chunk_size(chunk_size: usize) -> spinchart_common::Result<()> {
    if chunk_size == 0 {
        return Err(spinchart_common::SpinchartError::validation_field(
            "chunk_size must be positive",
            "chunk_size",
        ));
    }
    Ok(())
}

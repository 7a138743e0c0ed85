//! Progress reporting.
//!
//! The pipeline never writes to a global handle; callers pass a
//! [`ProgressSink`] into every run. [`TracingProgress`] forwards events to
//! `tracing`, [`NoProgress`] drops them.

use std::sync::Mutex;
use std::time::Duration;

use matcher::VectorSet;
use semantic::{BatchProgress, BatchStage};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Coarse pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Normalize,
    EmbedReferences,
    EmbedInquiries,
    Score,
    Select,
    Write,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    StageStarted { stage: Stage },
    StageFinished { stage: Stage, elapsed_ms: u64 },
    Batch(BatchProgress),
    /// A vector with zero or non-finite magnitude; it scores 0 against everything.
    DegenerateVector { set: VectorSet, index: usize },
}

impl ProgressEvent {
    pub(crate) fn finished(stage: Stage, elapsed: Duration) -> Self {
        ProgressEvent::StageFinished {
            stage,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Receives progress events from a pipeline run.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::StageStarted { stage } => debug!(?stage, "stage started"),
            ProgressEvent::StageFinished { stage, elapsed_ms } => {
                info!(?stage, elapsed_ms, "stage finished")
            }
            ProgressEvent::Batch(batch) => match batch.stage {
                BatchStage::Started => debug!(
                    role = %batch.role,
                    batch = batch.batch_index + 1,
                    of = batch.batch_count,
                    "requesting embeddings"
                ),
                BatchStage::Finished => debug!(
                    role = %batch.role,
                    batch = batch.batch_index + 1,
                    of = batch.batch_count,
                    "received embeddings"
                ),
            },
            ProgressEvent::DegenerateVector { set, index } => {
                warn!(%set, index, "zero-norm embedding; similarity forced to 0")
            }
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProgressSink for CollectingProgress {
    fn report(&self, event: &ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

//! Core telemetry event types describing diagnostics data exposed to the
//! embedding application.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::analysis::viseme::Viseme;
use crate::engine::EngineState;

/// Events emitted by the engine while it runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LipSyncEvent {
    /// A feature vector was classified
    Classification {
        phoneme: String,
        confidence: f32,
        timestamp_ms: u64,
    },
    /// A viseme was resolved and handed to the blender
    FrameApplied {
        viseme: Viseme,
        bindings: usize,
        timestamp_ms: u64,
    },
    /// The orchestrator changed state
    StateChanged {
        from: EngineState,
        to: EngineState,
    },
    /// Warm-up completed for the bound model
    WarmedUp {
        face_targets: usize,
        tongue_targets: usize,
    },
}

/// Wrap a broadcast receiver as a stream for async consumers
///
/// Slow consumers observe `BroadcastStreamRecvError::Lagged` instead of
/// blocking the engine.
pub fn event_stream(receiver: broadcast::Receiver<LipSyncEvent>) -> BroadcastStream<LipSyncEvent> {
    BroadcastStream::new(receiver)
}

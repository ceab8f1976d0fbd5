// Telemetry - host-facing diagnostic events
//
// The engine broadcasts structured events over a tokio broadcast channel so
// the embedding application can drive debug overlays (live phoneme, applied
// viseme, state transitions) without polling engine state.

pub mod events;

pub use events::{event_stream, LipSyncEvent};

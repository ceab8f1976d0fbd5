// Backend abstractions for morph target output
//
// The blender never talks to a renderer directly. Engine-specific adapters
// implement only "set influence on named target" plus the batch bracket;
// the decay/raise/clamp algorithm stays renderer-agnostic and testable.
//
// The batch bracket exists because per-write synchronization makes some
// renderers recompile the material/shader once per influence change. All
// writes of one tick go between begin_batch and end_batch so the renderer
// synchronizes at most once per mesh per tick.

use crate::rig::MeshChannel;

/// Trait implemented by renderer-specific morph target adapters
pub trait MorphTargetBackend: Send {
    /// Open the write bracket for one mesh; no synchronization until the
    /// matching end_batch
    fn begin_batch(&mut self, mesh: MeshChannel);

    /// Write one influence value; a target name unknown to the mesh must be
    /// ignored, never an error
    fn set_influence(&mut self, mesh: MeshChannel, target: &str, value: f32);

    /// Close the write bracket and let the renderer synchronize once
    fn end_batch(&mut self, mesh: MeshChannel);
}

/// Backend that discards every write
///
/// Useful when a host wants to run the pipeline headless (e.g. to drive
/// telemetry only).
#[derive(Debug, Default)]
pub struct NullBackend;

impl MorphTargetBackend for NullBackend {
    fn begin_batch(&mut self, _mesh: MeshChannel) {}
    fn set_influence(&mut self, _mesh: MeshChannel, _target: &str, _value: f32) {}
    fn end_batch(&mut self, _mesh: MeshChannel) {}
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Begin(MeshChannel),
    Set(MeshChannel, String, f32),
    End(MeshChannel),
}

/// Backend that records every call for deterministic tests
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub events: Vec<BackendEvent>,
    open: Vec<MeshChannel>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed brackets for one mesh
    pub fn batch_count(&self, mesh: MeshChannel) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, BackendEvent::End(m) if *m == mesh))
            .count()
    }

    /// Every write for one mesh, in order
    pub fn writes(&self, mesh: MeshChannel) -> Vec<(String, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BackendEvent::Set(m, target, value) if *m == mesh => {
                    Some((target.clone(), *value))
                }
                _ => None,
            })
            .collect()
    }

    /// The most recent write for one target
    pub fn last_write(&self, mesh: MeshChannel, target: &str) -> Option<f32> {
        self.writes(mesh)
            .into_iter()
            .rev()
            .find(|(name, _)| name == target)
            .map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl MorphTargetBackend for RecordingBackend {
    fn begin_batch(&mut self, mesh: MeshChannel) {
        assert!(
            !self.open.contains(&mesh),
            "begin_batch({:?}) while bracket already open",
            mesh
        );
        self.open.push(mesh);
        self.events.push(BackendEvent::Begin(mesh));
    }

    fn set_influence(&mut self, mesh: MeshChannel, target: &str, value: f32) {
        assert!(
            self.open.contains(&mesh),
            "set_influence({:?}, {}) outside a bracket",
            mesh,
            target
        );
        self.events
            .push(BackendEvent::Set(mesh, target.to_string(), value));
    }

    fn end_batch(&mut self, mesh: MeshChannel) {
        assert!(
            self.open.contains(&mesh),
            "end_batch({:?}) without begin_batch",
            mesh
        );
        self.open.retain(|m| *m != mesh);
        self.events.push(BackendEvent::End(mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_backend_tracks_brackets_and_writes() {
        let mut backend = RecordingBackend::new();
        backend.begin_batch(MeshChannel::Face);
        backend.set_influence(MeshChannel::Face, "Jaw_Open", 0.5);
        backend.set_influence(MeshChannel::Face, "Jaw_Open", 0.25);
        backend.end_batch(MeshChannel::Face);

        assert_eq!(backend.batch_count(MeshChannel::Face), 1);
        assert_eq!(backend.batch_count(MeshChannel::Tongue), 0);
        assert_eq!(backend.last_write(MeshChannel::Face, "Jaw_Open"), Some(0.25));
    }

    #[test]
    #[should_panic(expected = "outside a bracket")]
    fn test_recording_backend_rejects_unbracketed_writes() {
        let mut backend = RecordingBackend::new();
        backend.set_influence(MeshChannel::Face, "Jaw_Open", 0.5);
    }
}

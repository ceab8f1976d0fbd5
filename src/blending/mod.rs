// AnimationBlender - temporal blending of morph target influences
//
// The blender owns the live per-mesh influence state and is the only code
// that mutates it. Each tick it decays every nonzero influence, raises the
// targets named by the incoming bindings to max(decayed, incoming) so a new
// viseme never fights the trailing decay downward, clamps to [0.0, 1.0],
// and enforces the per-mesh influencer cap. All writes of one tick go out
// through one batch bracket per mesh, with every affected mesh bracketed
// inside the same tick so face and tongue never desynchronize by a frame.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::BlendingConfig;
use crate::rig::{MeshChannel, MorphTargetBinding, MorphTargetDirectory};

mod backend;

pub use backend::{BackendEvent, MorphTargetBackend, NullBackend, RecordingBackend};

/// Influences below this snap to zero instead of decaying forever
const ZERO_EPSILON: f32 = 1e-3;

/// Influence used for the warm-up nudge
const WARM_UP_VALUE: f32 = 1.0;

/// Per-mesh, per-target influence snapshot
///
/// Owned exclusively by the blender; [AnimationBlender::current_state]
/// hands out copies. BTreeMap keeps snapshots deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlendState {
    face: BTreeMap<String, f32>,
    tongue: BTreeMap<String, f32>,
}

impl BlendState {
    fn map(&self, mesh: MeshChannel) -> &BTreeMap<String, f32> {
        match mesh {
            MeshChannel::Face => &self.face,
            MeshChannel::Tongue => &self.tongue,
        }
    }

    fn map_mut(&mut self, mesh: MeshChannel) -> &mut BTreeMap<String, f32> {
        match mesh {
            MeshChannel::Face => &mut self.face,
            MeshChannel::Tongue => &mut self.tongue,
        }
    }

    /// Influence of one target; unknown targets read as 0.0
    pub fn get(&self, mesh: MeshChannel, target: &str) -> f32 {
        self.map(mesh).get(target).copied().unwrap_or(0.0)
    }

    /// All known targets of one mesh with their influences
    pub fn influences(&self, mesh: MeshChannel) -> impl Iterator<Item = (&str, f32)> {
        self.map(mesh).iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of nonzero influences on one mesh
    pub fn active_count(&self, mesh: MeshChannel) -> usize {
        self.map(mesh).values().filter(|v| **v > 0.0).count()
    }

    pub fn is_all_zero(&self) -> bool {
        MeshChannel::ALL
            .iter()
            .all(|mesh| self.map(*mesh).values().all(|v| *v == 0.0))
    }
}

/// Owns and mutates the live blend state
pub struct AnimationBlender {
    config: BlendingConfig,
    state: BlendState,
    warmed: bool,
}

impl AnimationBlender {
    pub fn new(config: BlendingConfig) -> Self {
        Self {
            config,
            state: BlendState::default(),
            warmed: false,
        }
    }

    /// One-time shader warm-up
    ///
    /// Nudges one morph target per mesh to a nonzero influence and back to
    /// zero, each inside its own bracket, so the renderer compiles its
    /// morph-target shader permutation before real playback. Also registers
    /// every directory target at influence 0.0 so snapshots list the full
    /// rig. Subsequent calls are no-ops.
    pub fn warm_up(
        &mut self,
        directory: &MorphTargetDirectory,
        backend: &mut dyn MorphTargetBackend,
    ) {
        if self.warmed {
            return;
        }

        for mesh in MeshChannel::ALL {
            let map = self.state.map_mut(mesh);
            for target in directory.targets(mesh) {
                map.entry(target.to_string()).or_insert(0.0);
            }

            let Some(target) = directory.any_target(mesh) else {
                continue;
            };

            log::debug!("[Blender] warming up {} mesh via {}", mesh.name(), target);
            backend.begin_batch(mesh);
            backend.set_influence(mesh, target, WARM_UP_VALUE);
            backend.end_batch(mesh);

            backend.begin_batch(mesh);
            backend.set_influence(mesh, target, 0.0);
            backend.end_batch(mesh);
        }

        self.warmed = true;
    }

    /// Apply one tick of bindings
    ///
    /// Decays, raises, clamps, caps, then pushes every changed value to the
    /// backend inside one bracket per mesh. Bindings naming targets the
    /// renderer does not know are tolerated; the backend ignores them.
    pub fn apply_frame(
        &mut self,
        bindings: &[MorphTargetBinding],
        backend: &mut dyn MorphTargetBackend,
    ) {
        let previous = self.state.clone();

        // Decay every nonzero influence
        for mesh in MeshChannel::ALL {
            for value in self.state.map_mut(mesh).values_mut() {
                if *value > 0.0 {
                    *value *= self.config.decay_factor;
                    if *value < ZERO_EPSILON {
                        *value = 0.0;
                    }
                }
            }
        }

        // Raise incoming bindings; new activation wins over trailing decay
        for binding in bindings {
            let map = self.state.map_mut(binding.mesh);
            let entry = map.entry(binding.target.clone()).or_insert(0.0);
            *entry = entry.max(binding.weight).clamp(0.0, 1.0);
        }

        self.enforce_influencer_cap();
        self.flush_changes(&previous, backend);
    }

    /// Zero every influence and push the zeros out
    pub fn reset(&mut self, backend: &mut dyn MorphTargetBackend) {
        let previous = self.state.clone();
        for mesh in MeshChannel::ALL {
            for value in self.state.map_mut(mesh).values_mut() {
                *value = 0.0;
            }
        }
        self.flush_changes(&previous, backend);
    }

    /// Snapshot of the current influences
    pub fn current_state(&self) -> BlendState {
        self.state.clone()
    }

    /// Zero the smallest influences beyond the per-mesh cap
    fn enforce_influencer_cap(&mut self) {
        let cap = self.config.max_influencers;
        for mesh in MeshChannel::ALL {
            let map = self.state.map_mut(mesh);
            let active = map.values().filter(|v| **v > 0.0).count();
            if active <= cap {
                continue;
            }

            let mut ranked: Vec<(String, f32)> = map
                .iter()
                .filter(|(_, v)| **v > 0.0)
                .map(|(name, value)| (name.clone(), *value))
                .collect();
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });

            for (name, _) in ranked.into_iter().skip(cap) {
                log::debug!(
                    "[Blender] influencer cap {} hit on {} mesh, zeroing {}",
                    cap,
                    mesh.name(),
                    name
                );
                map.insert(name, 0.0);
            }
        }
    }

    /// Push every changed value inside one bracket per affected mesh
    ///
    /// Brackets for all affected meshes open before the first write and
    /// close after the last one, keeping multi-mesh visemes in the same
    /// renderer synchronization.
    fn flush_changes(&self, previous: &BlendState, backend: &mut dyn MorphTargetBackend) {
        let mut changes: Vec<(MeshChannel, &str, f32)> = Vec::new();
        for mesh in MeshChannel::ALL {
            for (name, value) in self.state.map(mesh) {
                if previous.get(mesh, name) != *value {
                    changes.push((mesh, name.as_str(), *value));
                }
            }
        }
        if changes.is_empty() {
            return;
        }

        let affected: Vec<MeshChannel> = MeshChannel::ALL
            .into_iter()
            .filter(|mesh| changes.iter().any(|(m, _, _)| m == mesh))
            .collect();

        for mesh in &affected {
            backend.begin_batch(*mesh);
        }
        for (mesh, target, value) in &changes {
            backend.set_influence(*mesh, target, *value);
        }
        for mesh in &affected {
            backend.end_batch(*mesh);
        }
    }
}

#[cfg(test)]
#[path = "blending_tests.rs"]
mod tests;

// Rig module - morph target vocabularies and binding resolution
//
// A viseme is abstract; a mesh only knows morph target names. Several
// mutually incompatible naming vocabularies exist depending on the source
// asset pipeline (Reallusion/CC exports, ARKit-style trackers, VRM/VRoid
// avatars). This module owns the vocabulary tables, the directory of morph
// targets actually present on the bound meshes, and the resolver that turns
// a viseme into concrete weighted bindings.
//
// Resolution never mutates mesh state. It only computes a declarative
// binding set for the blender to apply.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub(crate) mod recipes;
mod resolver;

pub use resolver::BlendShapeResolver;

/// Which mesh a binding applies to
///
/// Face and tongue are commonly skinned as separate meshes with separate
/// morph target managers; they must still move in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshChannel {
    Face,
    Tongue,
}

impl MeshChannel {
    pub const ALL: [MeshChannel; 2] = [MeshChannel::Face, MeshChannel::Tongue];

    pub fn name(self) -> &'static str {
        match self {
            MeshChannel::Face => "face",
            MeshChannel::Tongue => "tongue",
        }
    }
}

/// Morph target naming vocabulary of the bound model
///
/// Each variant carries its own complete recipe table; the scheme is
/// resolved once at bind time instead of probing name strings at every call
/// site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// Reallusion/Character Creator "V_" viseme morphs
    Reallusion,
    /// ARKit-style face blendshapes (also ReadyPlayerMe exports)
    ArKit,
    /// VRM expression presets (VRM 1.0 names, VRM 0.x and VRoid aliases)
    VrmStandard,
}

/// One weighted morph target write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphTargetBinding {
    pub mesh: MeshChannel,
    /// Morph target name as the mesh spells it
    pub target: String,
    /// Influence weight (0.0-1.0)
    pub weight: f32,
}

/// Morph targets actually present on the bound meshes
///
/// Discovered by the host from the renderer's mesh data at bind time and
/// handed to the engine; the resolver consults it so that a recipe entry
/// whose target does not exist is dropped instead of failing.
#[derive(Debug, Clone, Default)]
pub struct MorphTargetDirectory {
    face: HashSet<String>,
    tongue: HashSet<String>,
}

impl MorphTargetDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every face-mesh morph target name
    pub fn with_face_targets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.face.extend(names.into_iter().map(Into::into));
        self
    }

    /// Register every tongue-mesh morph target name
    pub fn with_tongue_targets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tongue.extend(names.into_iter().map(Into::into));
        self
    }

    fn set(&self, mesh: MeshChannel) -> &HashSet<String> {
        match mesh {
            MeshChannel::Face => &self.face,
            MeshChannel::Tongue => &self.tongue,
        }
    }

    pub fn has(&self, mesh: MeshChannel, target: &str) -> bool {
        self.set(mesh).contains(target)
    }

    pub fn is_empty(&self) -> bool {
        self.face.is_empty() && self.tongue.is_empty()
    }

    /// Number of targets on one mesh
    pub fn len(&self, mesh: MeshChannel) -> usize {
        self.set(mesh).len()
    }

    /// Iterate target names on one mesh (arbitrary order)
    pub fn targets(&self, mesh: MeshChannel) -> impl Iterator<Item = &str> {
        self.set(mesh).iter().map(String::as_str)
    }

    /// Any deterministic target name on one mesh, used for warm-up
    pub fn any_target(&self, mesh: MeshChannel) -> Option<&str> {
        self.set(mesh).iter().map(String::as_str).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_membership() {
        let dir = MorphTargetDirectory::new()
            .with_face_targets(["Jaw_Open", "V_Explosive"])
            .with_tongue_targets(["V_Tongue_Out"]);

        assert!(dir.has(MeshChannel::Face, "Jaw_Open"));
        assert!(!dir.has(MeshChannel::Face, "V_Tongue_Out"));
        assert!(dir.has(MeshChannel::Tongue, "V_Tongue_Out"));
        assert!(!dir.is_empty());
        assert_eq!(dir.len(MeshChannel::Face), 2);
        assert_eq!(dir.len(MeshChannel::Tongue), 1);
    }

    #[test]
    fn test_empty_directory() {
        let dir = MorphTargetDirectory::new();
        assert!(dir.is_empty());
        assert_eq!(dir.any_target(MeshChannel::Face), None);
    }

    #[test]
    fn test_any_target_is_deterministic() {
        let dir = MorphTargetDirectory::new().with_face_targets(["b", "a", "c"]);
        assert_eq!(dir.any_target(MeshChannel::Face), Some("a"));
    }

    #[test]
    fn test_naming_scheme_serde_names() {
        let json = serde_json::to_string(&NamingScheme::VrmStandard).unwrap();
        assert_eq!(json, "\"vrm_standard\"");
        let parsed: NamingScheme = serde_json::from_str("\"reallusion\"").unwrap();
        assert_eq!(parsed, NamingScheme::Reallusion);
    }
}

// BlendShapeResolver - viseme to weighted morph target bindings
//
// Resolution walks each recipe entry through the scheme vocabulary: try the
// primary name on the entry's mesh, then the aliases in order, and drop the
// entry with a debug log when nothing matches. The other entries of the
// viseme still apply; a partially equipped mesh gets a partial pose, never
// an error.

use std::collections::HashMap;

use crate::analysis::viseme::Viseme;
use crate::rig::recipes;
use crate::rig::{MeshChannel, MorphTargetBinding, MorphTargetDirectory, NamingScheme};

/// Computes declarative binding sets for one naming scheme
///
/// Stateless apart from its construction parameters; safe to share and call
/// from tests without a renderer.
pub struct BlendShapeResolver {
    scheme: NamingScheme,
    /// Overall intensity scale from the blending configuration
    intensity: f32,
}

impl BlendShapeResolver {
    pub fn new(scheme: NamingScheme, intensity: f32) -> Self {
        Self { scheme, intensity }
    }

    pub fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    /// Resolve one viseme against the bound meshes
    ///
    /// # Returns
    /// Bindings for every recipe entry whose concept could be named on the
    /// directory, weights scaled by intensity. Duplicate targets (two
    /// concepts aliasing onto one morph) keep the larger weight.
    pub fn resolve(
        &self,
        viseme: Viseme,
        directory: &MorphTargetDirectory,
    ) -> Vec<MorphTargetBinding> {
        let vocabulary = recipes::vocabulary(self.scheme);
        let mut merged: HashMap<(MeshChannel, String), f32> = HashMap::new();
        let mut order: Vec<(MeshChannel, String)> = Vec::new();

        for entry in recipes::recipe(self.scheme, viseme) {
            let Some(names) = vocabulary.get(&entry.concept) else {
                log::debug!(
                    "[Resolver] {:?} does not name concept {}, dropping",
                    self.scheme,
                    entry.concept.name()
                );
                continue;
            };

            let found = std::iter::once(names.primary)
                .chain(names.aliases.iter().copied())
                .find(|name| directory.has(names.mesh, name));

            let Some(target) = found else {
                log::debug!(
                    "[Resolver] no {} target for {} on {} mesh, dropping",
                    self.scheme_label(),
                    entry.concept.name(),
                    names.mesh.name()
                );
                continue;
            };

            let weight = (entry.weight * self.intensity).clamp(0.0, 1.0);
            let key = (names.mesh, target.to_string());
            match merged.get_mut(&key) {
                Some(existing) => *existing = existing.max(weight),
                None => {
                    merged.insert(key.clone(), weight);
                    order.push(key);
                }
            }
        }

        order
            .into_iter()
            .map(|key| {
                let weight = merged[&key];
                MorphTargetBinding {
                    mesh: key.0,
                    target: key.1,
                    weight,
                }
            })
            .collect()
    }

    fn scheme_label(&self) -> &'static str {
        match self.scheme {
            NamingScheme::Reallusion => "reallusion",
            NamingScheme::ArKit => "arkit",
            NamingScheme::VrmStandard => "vrm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Directory matching a full Reallusion CC export
    fn reallusion_directory() -> MorphTargetDirectory {
        MorphTargetDirectory::new()
            .with_face_targets([
                "Jaw_Open",
                "V_Explosive",
                "V_Dental_Lip",
                "V_Tight_O",
                "V_Tight",
                "V_Wide",
                "V_Lip_Open",
            ])
            .with_tongue_targets(["V_Tongue_Out", "V_Tongue_up", "V_Tongue_Curl-U"])
    }

    fn resolver(scheme: NamingScheme) -> BlendShapeResolver {
        BlendShapeResolver::new(scheme, 1.0)
    }

    #[test]
    fn test_scenario_reallusion_pp_presses_never_puckers() {
        let bindings = resolver(NamingScheme::Reallusion)
            .resolve(Viseme::PP, &reallusion_directory());

        let press = bindings
            .iter()
            .find(|b| b.target == "V_Explosive")
            .expect("PP must bind the explosive closure target");
        assert_eq!(press.weight, 1.0);

        for binding in &bindings {
            if binding.target != "V_Explosive" {
                assert!(
                    binding.weight < 0.3,
                    "auxiliary {} at {}",
                    binding.target,
                    binding.weight
                );
            }
            assert_ne!(binding.target, "V_Tight", "pucker bound for PP");
            assert_ne!(binding.target, "V_Tight_O", "funnel bound for PP");
            assert_ne!(binding.target, "Mouth_Pucker", "pucker alias bound for PP");
        }
    }

    #[test]
    fn test_all_weights_in_unit_range_for_every_viseme() {
        let dir = reallusion_directory();
        let resolver = resolver(NamingScheme::Reallusion);
        for viseme in Viseme::ALL {
            for binding in resolver.resolve(viseme, &dir) {
                assert!(
                    (0.0..=1.0).contains(&binding.weight),
                    "{:?}/{} = {}",
                    viseme,
                    binding.target,
                    binding.weight
                );
            }
        }
    }

    #[test]
    fn test_missing_target_drops_only_that_binding() {
        // Tongue mesh lacks every target: TH keeps its face bindings
        let dir = MorphTargetDirectory::new().with_face_targets([
            "Jaw_Open",
            "V_Lip_Open",
            "V_Explosive",
        ]);

        let bindings = resolver(NamingScheme::Reallusion).resolve(Viseme::TH, &dir);
        assert!(
            !bindings.is_empty(),
            "face bindings survive a missing tongue mesh"
        );
        assert!(bindings.iter().all(|b| b.mesh == MeshChannel::Face));
        assert!(bindings.iter().any(|b| b.target == "Jaw_Open"));
    }

    #[test]
    fn test_alias_fallback_order() {
        // No "Jaw_Open": first alias "Mouth_Open" must be chosen over "V_Open"
        let dir = MorphTargetDirectory::new().with_face_targets([
            "Mouth_Open",
            "V_Open",
            "V_Lip_Open",
        ]);

        let bindings = resolver(NamingScheme::Reallusion).resolve(Viseme::AA, &dir);
        assert!(bindings.iter().any(|b| b.target == "Mouth_Open"));
        assert!(!bindings.iter().any(|b| b.target == "V_Open"));
    }

    #[test]
    fn test_tongue_bindings_route_to_tongue_mesh() {
        let bindings = resolver(NamingScheme::Reallusion)
            .resolve(Viseme::TH, &reallusion_directory());

        let tongue = bindings
            .iter()
            .find(|b| b.target == "V_Tongue_Out")
            .expect("TH binds the tongue");
        assert_eq!(tongue.mesh, MeshChannel::Tongue);

        // Face entries of the same viseme stay on the face mesh
        assert!(bindings
            .iter()
            .filter(|b| b.target != "V_Tongue_Out")
            .all(|b| b.mesh == MeshChannel::Face));
    }

    #[test]
    fn test_arkit_tongue_lives_on_face_mesh() {
        let dir = MorphTargetDirectory::new().with_face_targets([
            "jawOpen",
            "mouthOpen",
            "tongueOut",
        ]);

        let bindings = resolver(NamingScheme::ArKit).resolve(Viseme::TH, &dir);
        let tongue = bindings
            .iter()
            .find(|b| b.target == "tongueOut")
            .expect("ARKit TH binds tongueOut");
        assert_eq!(tongue.mesh, MeshChannel::Face);
    }

    #[test]
    fn test_duplicate_targets_merge_to_max_weight() {
        // VRM: FF resolves VowelE and JawOpen; on a mesh exposing only the
        // VRM 0.x names both concepts stay distinct, but MouthOpen-style
        // duplicates collapse. Exercise via ArKit where MouthOpen aliases
        // onto jawOpen.
        let dir = MorphTargetDirectory::new().with_face_targets(["jawOpen", "mouthSmile"]);

        let bindings = resolver(NamingScheme::ArKit).resolve(Viseme::E, &dir);
        let jaw: Vec<_> = bindings.iter().filter(|b| b.target == "jawOpen").collect();
        assert_eq!(jaw.len(), 1, "duplicate jawOpen bindings must merge");
        // MouthOpen 0.4 aliases to jawOpen and wins over JawOpen 0.35
        assert!((jaw[0].weight - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_intensity_scales_weights() {
        let resolver = BlendShapeResolver::new(NamingScheme::Reallusion, 0.5);
        let bindings = resolver.resolve(Viseme::AA, &reallusion_directory());
        let jaw = bindings.iter().find(|b| b.target == "Jaw_Open").unwrap();
        assert!((jaw.weight - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_silence_resolves_to_no_bindings() {
        let bindings =
            resolver(NamingScheme::Reallusion).resolve(Viseme::Sil, &reallusion_directory());
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_empty_directory_resolves_to_nothing_without_error() {
        let dir = MorphTargetDirectory::new();
        for viseme in Viseme::ALL {
            assert!(resolver(NamingScheme::Reallusion).resolve(viseme, &dir).is_empty());
        }
    }

    #[test]
    fn test_vrm_aliases_reach_vrm0_names() {
        let dir = MorphTargetDirectory::new().with_face_targets(["A", "I", "U", "E", "O"]);

        let bindings = resolver(NamingScheme::VrmStandard).resolve(Viseme::AA, &dir);
        assert!(bindings.iter().any(|b| b.target == "A"));

        let bindings = resolver(NamingScheme::VrmStandard).resolve(Viseme::U, &dir);
        assert!(bindings.iter().any(|b| b.target == "U"));
    }
}

// Viseme recipe tables, one per naming scheme
//
// Recipes are expressed over articulation concepts rather than raw names so
// the alias fallback has something stable to key on: a scheme maps each
// concept to a primary morph name plus ordered aliases, and a viseme maps to
// weighted concepts.
//
// Bilabial closure (PP) must read as lips pressed flat, so its recipes use
// LipsPress only. LipPucker/LipFunnel produce a kiss shape and belong to the
// rounded visemes; substituting them for PP is the classic artifact this
// table layout rules out.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::analysis::viseme::Viseme;
use crate::rig::{MeshChannel, NamingScheme};

/// Articulation concepts the schemes know how to name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MorphConcept {
    /// Chin drop
    JawOpen,
    /// Lips pressed flat against each other
    LipsPress,
    /// Lower lip tucked under the upper teeth
    DentalLip,
    /// Lips forward in an open O
    LipFunnel,
    /// Lips forward and tight
    LipPucker,
    /// Corners stretched wide
    MouthWide,
    /// Lips parted without jaw movement
    MouthOpen,
    /// Mid-open unrounded "eh" preset (VRM-style vocabularies)
    VowelE,
    /// Tongue visible between the teeth
    TongueOut,
    /// Tongue tip on the alveolar ridge
    TongueUp,
    /// Tongue curled back
    TongueCurl,
}

impl MorphConcept {
    pub(crate) fn name(self) -> &'static str {
        match self {
            MorphConcept::JawOpen => "jaw_open",
            MorphConcept::LipsPress => "lips_press",
            MorphConcept::DentalLip => "dental_lip",
            MorphConcept::LipFunnel => "lip_funnel",
            MorphConcept::LipPucker => "lip_pucker",
            MorphConcept::MouthWide => "mouth_wide",
            MorphConcept::MouthOpen => "mouth_open",
            MorphConcept::VowelE => "vowel_e",
            MorphConcept::TongueOut => "tongue_out",
            MorphConcept::TongueUp => "tongue_up",
            MorphConcept::TongueCurl => "tongue_curl",
        }
    }
}

/// How one scheme spells one concept
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConceptNames {
    pub mesh: MeshChannel,
    pub primary: &'static str,
    /// Tried in order when the primary is absent on the mesh
    pub aliases: &'static [&'static str],
}

/// One weighted concept inside a viseme recipe
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecipeEntry {
    pub concept: MorphConcept,
    pub weight: f32,
}

fn e(concept: MorphConcept, weight: f32) -> RecipeEntry {
    RecipeEntry { concept, weight }
}

type Vocabulary = HashMap<MorphConcept, ConceptNames>;
type RecipeTable = HashMap<Viseme, Vec<RecipeEntry>>;

fn names(
    mesh: MeshChannel,
    primary: &'static str,
    aliases: &'static [&'static str],
) -> ConceptNames {
    ConceptNames {
        mesh,
        primary,
        aliases,
    }
}

static REALLUSION_VOCAB: Lazy<Vocabulary> = Lazy::new(|| {
    use MeshChannel::*;
    use MorphConcept::*;
    HashMap::from([
        (JawOpen, names(Face, "Jaw_Open", &["Mouth_Open", "V_Open"])),
        (LipsPress, names(Face, "V_Explosive", &["Mouth_Close"])),
        (DentalLip, names(Face, "V_Dental_Lip", &["Mouth_Bottom_Lip_Bite"])),
        (LipFunnel, names(Face, "V_Tight_O", &["Mouth_Funnel"])),
        (LipPucker, names(Face, "V_Tight", &["Mouth_Pucker"])),
        (MouthWide, names(Face, "V_Wide", &["Mouth_Widen", "Mouth_Smile"])),
        (MouthOpen, names(Face, "V_Lip_Open", &["Mouth_Lips_Part"])),
        (TongueOut, names(Tongue, "V_Tongue_Out", &["Tongue_Out"])),
        (TongueUp, names(Tongue, "V_Tongue_up", &["Tongue_Up"])),
        (TongueCurl, names(Tongue, "V_Tongue_Curl-U", &["Tongue_Curl"])),
    ])
});

static ARKIT_VOCAB: Lazy<Vocabulary> = Lazy::new(|| {
    use MeshChannel::*;
    use MorphConcept::*;
    HashMap::from([
        (JawOpen, names(Face, "jawOpen", &[])),
        (LipsPress, names(Face, "mouthClose", &["mouthPressLeft"])),
        (DentalLip, names(Face, "mouthRollLower", &["mouthShrugLower"])),
        (LipFunnel, names(Face, "mouthFunnel", &[])),
        (LipPucker, names(Face, "mouthPucker", &[])),
        (MouthWide, names(Face, "mouthSmile", &["mouthSmileLeft", "mouthStretchLeft"])),
        (MouthOpen, names(Face, "mouthOpen", &["jawOpen"])),
        // ARKit-style rigs keep the tongue on the face mesh
        (TongueOut, names(Face, "tongueOut", &[])),
        (TongueUp, names(Face, "tongueUp", &["tongueOut"])),
        (TongueCurl, names(Face, "tongueCurl", &[])),
    ])
});

static VRM_VOCAB: Lazy<Vocabulary> = Lazy::new(|| {
    use MeshChannel::*;
    use MorphConcept::*;
    HashMap::from([
        (JawOpen, names(Face, "aa", &["A", "Fcl_MTH_A"])),
        (MouthWide, names(Face, "ih", &["I", "Fcl_MTH_I"])),
        (VowelE, names(Face, "ee", &["E", "Fcl_MTH_E"])),
        (LipFunnel, names(Face, "oh", &["O", "Fcl_MTH_O"])),
        (LipPucker, names(Face, "ou", &["U", "Fcl_MTH_U"])),
        (LipsPress, names(Face, "Fcl_MTH_Close", &[])),
        (TongueOut, names(Face, "Fcl_MTH_Tongue_Out", &[])),
        (TongueUp, names(Face, "Fcl_MTH_Tongue_Up", &[])),
    ])
});

static REALLUSION_RECIPES: Lazy<RecipeTable> = Lazy::new(|| {
    use MorphConcept::*;
    HashMap::from([
        (Viseme::Sil, vec![]),
        // Pressed, never puckered
        (Viseme::PP, vec![e(LipsPress, 1.0), e(JawOpen, 0.1)]),
        (Viseme::FF, vec![e(DentalLip, 0.9), e(JawOpen, 0.15)]),
        (
            Viseme::TH,
            vec![e(TongueOut, 0.9), e(MouthOpen, 0.4), e(JawOpen, 0.3)],
        ),
        (
            Viseme::DD,
            vec![e(TongueUp, 0.8), e(MouthOpen, 0.4), e(JawOpen, 0.25)],
        ),
        (
            Viseme::KK,
            vec![e(JawOpen, 0.3), e(MouthOpen, 0.35), e(TongueUp, 0.2)],
        ),
        (
            Viseme::CH,
            vec![e(LipFunnel, 0.85), e(MouthOpen, 0.3), e(JawOpen, 0.2)],
        ),
        (
            Viseme::SS,
            vec![e(MouthWide, 0.5), e(MouthOpen, 0.3), e(JawOpen, 0.1)],
        ),
        (
            Viseme::NN,
            vec![e(TongueUp, 0.8), e(MouthOpen, 0.4), e(JawOpen, 0.2)],
        ),
        (
            Viseme::RR,
            vec![e(TongueCurl, 0.7), e(LipFunnel, 0.3), e(JawOpen, 0.2)],
        ),
        (Viseme::AA, vec![e(JawOpen, 0.9), e(MouthOpen, 0.8)]),
        (
            Viseme::E,
            vec![e(MouthOpen, 0.5), e(MouthWide, 0.45), e(JawOpen, 0.4)],
        ),
        (
            Viseme::I,
            vec![e(MouthWide, 0.9), e(MouthOpen, 0.3), e(JawOpen, 0.15)],
        ),
        (
            Viseme::O,
            vec![e(LipFunnel, 0.8), e(JawOpen, 0.5), e(MouthOpen, 0.4)],
        ),
        (
            Viseme::U,
            vec![e(LipPucker, 0.9), e(JawOpen, 0.2), e(MouthOpen, 0.2)],
        ),
    ])
});

static ARKIT_RECIPES: Lazy<RecipeTable> = Lazy::new(|| {
    use MorphConcept::*;
    HashMap::from([
        (Viseme::Sil, vec![]),
        (Viseme::PP, vec![e(LipsPress, 1.0), e(JawOpen, 0.08)]),
        (Viseme::FF, vec![e(DentalLip, 0.85), e(JawOpen, 0.12)]),
        (
            Viseme::TH,
            vec![e(TongueOut, 0.85), e(MouthOpen, 0.3), e(JawOpen, 0.25)],
        ),
        (
            Viseme::DD,
            vec![e(TongueUp, 0.7), e(MouthOpen, 0.3), e(JawOpen, 0.25)],
        ),
        (Viseme::KK, vec![e(JawOpen, 0.3), e(MouthOpen, 0.25)]),
        (Viseme::CH, vec![e(LipFunnel, 0.8), e(JawOpen, 0.2)]),
        (
            Viseme::SS,
            vec![e(MouthWide, 0.45), e(MouthOpen, 0.2), e(JawOpen, 0.1)],
        ),
        (
            Viseme::NN,
            vec![e(TongueUp, 0.7), e(MouthOpen, 0.3), e(JawOpen, 0.2)],
        ),
        (
            Viseme::RR,
            vec![e(TongueCurl, 0.6), e(LipFunnel, 0.3), e(JawOpen, 0.15)],
        ),
        (Viseme::AA, vec![e(JawOpen, 0.85), e(MouthOpen, 0.7)]),
        (
            Viseme::E,
            vec![e(MouthOpen, 0.4), e(MouthWide, 0.4), e(JawOpen, 0.35)],
        ),
        (
            Viseme::I,
            vec![e(MouthWide, 0.8), e(MouthOpen, 0.25), e(JawOpen, 0.15)],
        ),
        (Viseme::O, vec![e(LipFunnel, 0.75), e(JawOpen, 0.45)]),
        (Viseme::U, vec![e(LipPucker, 0.85), e(JawOpen, 0.15)]),
    ])
});

static VRM_RECIPES: Lazy<RecipeTable> = Lazy::new(|| {
    use MorphConcept::*;
    HashMap::from([
        (Viseme::Sil, vec![]),
        (Viseme::PP, vec![e(LipsPress, 0.9), e(JawOpen, 0.05)]),
        (Viseme::FF, vec![e(VowelE, 0.35), e(JawOpen, 0.15)]),
        (Viseme::TH, vec![e(TongueOut, 0.8), e(JawOpen, 0.3)]),
        (
            Viseme::DD,
            vec![e(TongueUp, 0.6), e(VowelE, 0.3), e(JawOpen, 0.2)],
        ),
        (Viseme::KK, vec![e(JawOpen, 0.3), e(VowelE, 0.2)]),
        (Viseme::CH, vec![e(LipFunnel, 0.7), e(JawOpen, 0.2)]),
        (Viseme::SS, vec![e(VowelE, 0.4), e(MouthWide, 0.3)]),
        (Viseme::NN, vec![e(TongueUp, 0.6), e(VowelE, 0.3)]),
        (Viseme::RR, vec![e(LipFunnel, 0.4), e(JawOpen, 0.2)]),
        (Viseme::AA, vec![e(JawOpen, 0.9)]),
        (Viseme::E, vec![e(VowelE, 0.8), e(JawOpen, 0.2)]),
        (Viseme::I, vec![e(MouthWide, 0.85), e(JawOpen, 0.1)]),
        (Viseme::O, vec![e(LipFunnel, 0.8), e(JawOpen, 0.3)]),
        (Viseme::U, vec![e(LipPucker, 0.85), e(JawOpen, 0.1)]),
    ])
});

/// Concept vocabulary for one scheme
pub(crate) fn vocabulary(scheme: NamingScheme) -> &'static Vocabulary {
    match scheme {
        NamingScheme::Reallusion => &REALLUSION_VOCAB,
        NamingScheme::ArKit => &ARKIT_VOCAB,
        NamingScheme::VrmStandard => &VRM_VOCAB,
    }
}

/// Recipe for one viseme under one scheme
pub(crate) fn recipe(scheme: NamingScheme, viseme: Viseme) -> &'static [RecipeEntry] {
    let table: &'static RecipeTable = match scheme {
        NamingScheme::Reallusion => &REALLUSION_RECIPES,
        NamingScheme::ArKit => &ARKIT_RECIPES,
        NamingScheme::VrmStandard => &VRM_RECIPES,
    };
    table.get(&viseme).map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMES: [NamingScheme; 3] = [
        NamingScheme::Reallusion,
        NamingScheme::ArKit,
        NamingScheme::VrmStandard,
    ];

    #[test]
    fn test_every_viseme_has_a_recipe_in_every_scheme() {
        for scheme in SCHEMES {
            for viseme in Viseme::ALL {
                // Sil is legitimately empty; everything else must pose the mouth
                let recipe = recipe(scheme, viseme);
                if viseme != Viseme::Sil {
                    assert!(
                        !recipe.is_empty(),
                        "{:?} has an empty recipe under {:?}",
                        viseme,
                        scheme
                    );
                }
            }
        }
    }

    #[test]
    fn test_recipe_weights_in_unit_range() {
        for scheme in SCHEMES {
            for viseme in Viseme::ALL {
                for entry in recipe(scheme, viseme) {
                    assert!(
                        (0.0..=1.0).contains(&entry.weight),
                        "{:?}/{:?}/{} weight {}",
                        scheme,
                        viseme,
                        entry.concept.name(),
                        entry.weight
                    );
                }
            }
        }
    }

    #[test]
    fn test_recipes_only_use_concepts_the_scheme_names() {
        for scheme in SCHEMES {
            let vocab = vocabulary(scheme);
            for viseme in Viseme::ALL {
                for entry in recipe(scheme, viseme) {
                    assert!(
                        vocab.contains_key(&entry.concept),
                        "{:?} recipe for {:?} uses unnamed concept {}",
                        scheme,
                        viseme,
                        entry.concept.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_bilabial_closure_never_uses_pucker_concepts() {
        for scheme in SCHEMES {
            for entry in recipe(scheme, Viseme::PP) {
                assert!(
                    entry.concept != MorphConcept::LipPucker
                        && entry.concept != MorphConcept::LipFunnel,
                    "{:?} PP recipe puckers the lips",
                    scheme
                );
            }
        }
    }

    #[test]
    fn test_pp_secondary_weights_stay_small() {
        for scheme in SCHEMES {
            let recipe = recipe(scheme, Viseme::PP);
            let press = recipe
                .iter()
                .find(|e| e.concept == MorphConcept::LipsPress)
                .expect("PP recipe carries a press entry");
            assert!(press.weight >= 0.9);
            for entry in recipe {
                if entry.concept != MorphConcept::LipsPress {
                    assert!(
                        entry.weight < 0.3,
                        "{:?} PP auxiliary {} at {}",
                        scheme,
                        entry.concept.name(),
                        entry.weight
                    );
                }
            }
        }
    }
}

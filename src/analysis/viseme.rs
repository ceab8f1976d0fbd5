// Viseme - visually distinct mouth-shape categories
//
// Roughly forty phonemes collapse onto fifteen shapes that can actually be
// told apart on a face. The mapping is a pure static lookup: configuration,
// not behavior, and never mutated at runtime. Unknown symbols map to
// silence so that a typo in an upstream phoneme sequence degrades to a
// closed mouth instead of an error.

use serde::{Deserialize, Serialize};

/// Mouth-shape category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viseme {
    /// Closed/neutral
    #[default]
    Sil,
    /// "p", "b", "m" (lips pressed together)
    PP,
    /// "f", "v" (teeth on lower lip)
    FF,
    /// "th" (tongue between teeth)
    TH,
    /// "t", "d" (tongue on ridge)
    DD,
    /// "k", "g", "ng" (back of tongue raised)
    KK,
    /// "ch", "j", "sh", "zh" (protruded lips)
    CH,
    /// "s", "z" (teeth together)
    SS,
    /// "n", "l" (tongue up, lips apart)
    NN,
    /// "r", "er" (slight rounding)
    RR,
    /// Open vowels ("ah")
    AA,
    /// Mid front vowels ("eh")
    E,
    /// Spread front vowels ("ee")
    I,
    /// Rounded mid vowels ("oh")
    O,
    /// Tightly rounded vowels ("oo")
    U,
}

impl Viseme {
    /// Map a phoneme symbol to its viseme
    ///
    /// Unknown symbols map to [Viseme::Sil].
    pub fn from_phoneme(phoneme: &str) -> Self {
        match phoneme {
            "AA" | "AH" | "AY" => Viseme::AA,
            "AE" | "EH" | "EY" | "HH" => Viseme::E,
            "IH" | "IY" | "Y" => Viseme::I,
            "AO" | "AW" | "OW" | "OY" => Viseme::O,
            "UH" | "UW" | "W" => Viseme::U,
            "ER" | "R" => Viseme::RR,
            "P" | "B" | "M" => Viseme::PP,
            "F" | "V" => Viseme::FF,
            "TH" | "DH" => Viseme::TH,
            "T" | "D" => Viseme::DD,
            "S" | "Z" => Viseme::SS,
            "SH" | "ZH" | "CH" | "JH" => Viseme::CH,
            "K" | "G" | "NG" => Viseme::KK,
            "N" | "L" => Viseme::NN,
            _ => Viseme::Sil,
        }
    }

    pub fn is_silence(&self) -> bool {
        *self == Viseme::Sil
    }

    /// Every viseme, silence first
    pub const ALL: [Viseme; 15] = [
        Viseme::Sil,
        Viseme::PP,
        Viseme::FF,
        Viseme::TH,
        Viseme::DD,
        Viseme::KK,
        Viseme::CH,
        Viseme::SS,
        Viseme::NN,
        Viseme::RR,
        Viseme::AA,
        Viseme::E,
        Viseme::I,
        Viseme::O,
        Viseme::U,
    ];
}

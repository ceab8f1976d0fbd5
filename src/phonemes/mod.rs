// Phoneme database - static linguistic properties
//
// This module stores the phoneme inventory consumed by the classifier and
// the viseme mapper: per-phoneme type, articulation place, manner, voicing,
// and roundedness. The table is pure data, built once at first access and
// never mutated afterwards, so classifier instances with different rule
// tables can share it safely.
//
// Symbols follow the ARPAbet convention ("AA", "P", ...) plus "sil" for
// silence, matching what landmark-driven and text-driven pipelines feed in.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The silence pseudo-phoneme symbol
pub const SILENCE: &str = "sil";

/// Linguistic type of a phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhonemeType {
    Vowel,
    Consonant,
    Silence,
}

/// Place of articulation for consonants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticulationPlace {
    Bilabial,
    Labiodental,
    Dental,
    Alveolar,
    PostAlveolar,
    Palatal,
    Velar,
    Glottal,
}

/// Manner of articulation for consonants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Manner {
    Plosive,
    Fricative,
    Affricate,
    Nasal,
    Approximant,
    Lateral,
}

/// Static linguistic properties of one phoneme
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phoneme {
    /// ARPAbet-style symbol ("AA", "P", "sil")
    pub symbol: &'static str,
    pub kind: PhonemeType,
    /// Consonants only
    pub place: Option<ArticulationPlace>,
    /// Consonants only
    pub manner: Option<Manner>,
    pub voiced: bool,
    /// Lips rounded during production
    pub rounded: bool,
}

impl Phoneme {
    pub fn is_vowel(&self) -> bool {
        self.kind == PhonemeType::Vowel
    }

    pub fn is_consonant(&self) -> bool {
        self.kind == PhonemeType::Consonant
    }

    pub fn is_silence(&self) -> bool {
        self.kind == PhonemeType::Silence
    }

    pub fn is_bilabial(&self) -> bool {
        self.place == Some(ArticulationPlace::Bilabial)
    }

    pub fn is_plosive(&self) -> bool {
        self.manner == Some(Manner::Plosive)
    }

    pub fn is_fricative(&self) -> bool {
        self.manner == Some(Manner::Fricative)
    }

    pub fn is_nasal(&self) -> bool {
        self.manner == Some(Manner::Nasal)
    }
}

const fn vowel(symbol: &'static str, rounded: bool) -> Phoneme {
    Phoneme {
        symbol,
        kind: PhonemeType::Vowel,
        place: None,
        manner: None,
        voiced: true,
        rounded,
    }
}

const fn consonant(
    symbol: &'static str,
    place: ArticulationPlace,
    manner: Manner,
    voiced: bool,
    rounded: bool,
) -> Phoneme {
    Phoneme {
        symbol,
        kind: PhonemeType::Consonant,
        place: Some(place),
        manner: Some(manner),
        voiced,
        rounded,
    }
}

/// The full inventory: 15 vowels, 24 consonants, silence
static INVENTORY: [Phoneme; 40] = {
    use ArticulationPlace::*;
    use Manner::*;
    [
        Phoneme {
            symbol: SILENCE,
            kind: PhonemeType::Silence,
            place: None,
            manner: None,
            voiced: false,
            rounded: false,
        },
        // Vowels
        vowel("AA", false),
        vowel("AE", false),
        vowel("AH", false),
        vowel("AO", true),
        vowel("AW", true),
        vowel("AY", false),
        vowel("EH", false),
        vowel("ER", false),
        vowel("EY", false),
        vowel("IH", false),
        vowel("IY", false),
        vowel("OW", true),
        vowel("OY", true),
        vowel("UH", true),
        vowel("UW", true),
        // Consonants
        consonant("P", Bilabial, Plosive, false, false),
        consonant("B", Bilabial, Plosive, true, false),
        consonant("M", Bilabial, Nasal, true, false),
        consonant("W", Bilabial, Approximant, true, true),
        consonant("F", Labiodental, Fricative, false, false),
        consonant("V", Labiodental, Fricative, true, false),
        consonant("TH", Dental, Fricative, false, false),
        consonant("DH", Dental, Fricative, true, false),
        consonant("T", Alveolar, Plosive, false, false),
        consonant("D", Alveolar, Plosive, true, false),
        consonant("N", Alveolar, Nasal, true, false),
        consonant("S", Alveolar, Fricative, false, false),
        consonant("Z", Alveolar, Fricative, true, false),
        consonant("L", Alveolar, Lateral, true, false),
        consonant("R", Alveolar, Approximant, true, true),
        consonant("SH", PostAlveolar, Fricative, false, true),
        consonant("ZH", PostAlveolar, Fricative, true, true),
        consonant("CH", PostAlveolar, Affricate, false, true),
        consonant("JH", PostAlveolar, Affricate, true, true),
        consonant("Y", Palatal, Approximant, true, false),
        consonant("K", Velar, Plosive, false, false),
        consonant("G", Velar, Plosive, true, false),
        consonant("NG", Velar, Nasal, true, false),
        consonant("HH", Glottal, Fricative, false, false),
    ]
};

static BY_SYMBOL: Lazy<HashMap<&'static str, &'static Phoneme>> =
    Lazy::new(|| INVENTORY.iter().map(|p| (p.symbol, p)).collect());

/// Look up a phoneme by symbol
pub fn lookup(symbol: &str) -> Option<&'static Phoneme> {
    BY_SYMBOL.get(symbol).copied()
}

/// The silence phoneme
pub fn silence() -> &'static Phoneme {
    lookup(SILENCE).expect("silence phoneme is always in the inventory")
}

/// Iterate the full inventory in declaration order
pub fn all() -> impl Iterator<Item = &'static Phoneme> {
    INVENTORY.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_symbols() {
        let p = lookup("P").unwrap();
        assert!(p.is_bilabial());
        assert!(p.is_plosive());
        assert!(!p.voiced);

        let aa = lookup("AA").unwrap();
        assert!(aa.is_vowel());
        assert!(!aa.rounded);

        let uw = lookup("UW").unwrap();
        assert!(uw.rounded);
    }

    #[test]
    fn test_lookup_unknown_symbol() {
        assert!(lookup("QQ").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_silence_entry() {
        let sil = silence();
        assert!(sil.is_silence());
        assert_eq!(sil.symbol, SILENCE);
    }

    #[test]
    fn test_inventory_symbols_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in all() {
            assert!(seen.insert(p.symbol), "duplicate symbol {}", p.symbol);
        }
        assert_eq!(seen.len(), 40);
    }

    #[test]
    fn test_group_predicates() {
        let fricatives: Vec<&str> = all()
            .filter(|p| p.is_fricative())
            .map(|p| p.symbol)
            .collect();
        assert!(fricatives.contains(&"F"));
        assert!(fricatives.contains(&"S"));
        assert!(!fricatives.contains(&"P"));

        let bilabials: Vec<&str> = all()
            .filter(|p| p.is_bilabial())
            .map(|p| p.symbol)
            .collect();
        assert_eq!(bilabials, vec!["P", "B", "M", "W"]);
    }
}

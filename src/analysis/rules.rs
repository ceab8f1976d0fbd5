// Classification rule set - per-phoneme geometric constraints
//
// Each phoneme carries a handful of feature ranges describing the mouth
// geometry that produces it. A range contributes a weighted proximity score
// when the measured value falls inside it and a weighted penalty when it
// falls outside; the classifier normalizes by the applicable weight mass so
// a vector sitting on every range center scores 1.0.
//
// The table is immutable configuration injected into the classifier at
// construction time. Range minima may sit below a feature's physical floor
// so that the range center lands on the articulatory ideal: full bilabial
// closure measures lip_separation = 0.0, so its range is [-0.2, 0.2] and the
// measured 0.0 scores a perfect proximity. The silence entry is centered
// slightly below the floor on purpose, so a deliberately closed mouth
// prefers the bilabial group over rest.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::analysis::features::FeatureKind;
use crate::error::ConfigError;
use crate::phonemes;

/// Acceptance range and weight for one feature
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f32,
    pub max: f32,
    pub weight: f32,
}

impl FeatureRange {
    pub fn center(&self) -> f32 {
        (self.min + self.max) / 2.0
    }

    pub fn half_range(&self) -> f32 {
        (self.max - self.min) / 2.0
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance beyond the nearer bound; 0.0 inside the range
    pub fn distance_outside(&self, value: f32) -> f32 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// One geometric constraint of a phoneme
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rule {
    pub feature: FeatureKind,
    pub range: FeatureRange,
}

/// All constraints for one phoneme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemeRules {
    /// Phoneme symbol; must exist in the phoneme database
    pub symbol: String,
    pub rules: Vec<Rule>,
}

/// Immutable rule table for a classifier instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    entries: Vec<PhonemeRules>,
}

impl RuleSet {
    /// Build a validated rule set
    ///
    /// # Returns
    /// * `Ok(RuleSet)` - Every entry names a known phoneme and carries
    ///   well-formed ranges
    /// * `Err(ConfigError)` - First malformed entry, with the reason
    pub fn new(entries: Vec<PhonemeRules>) -> Result<Self, ConfigError> {
        let mut seen = HashMap::new();
        for entry in &entries {
            if phonemes::lookup(&entry.symbol).is_none() {
                return Err(ConfigError::RuleInvalid {
                    reason: format!("unknown phoneme symbol {:?}", entry.symbol),
                });
            }
            if seen.insert(entry.symbol.clone(), ()).is_some() {
                return Err(ConfigError::RuleInvalid {
                    reason: format!("duplicate rules for {:?}", entry.symbol),
                });
            }
            if entry.rules.is_empty() {
                return Err(ConfigError::RuleInvalid {
                    reason: format!("{:?} has no rules", entry.symbol),
                });
            }
            for rule in &entry.rules {
                let r = &rule.range;
                if !(r.min < r.max) {
                    return Err(ConfigError::RuleInvalid {
                        reason: format!(
                            "{:?} {}: min {} not below max {}",
                            entry.symbol,
                            rule.feature.name(),
                            r.min,
                            r.max
                        ),
                    });
                }
                if !(r.weight > 0.0) || !r.weight.is_finite() {
                    return Err(ConfigError::RuleInvalid {
                        reason: format!(
                            "{:?} {}: weight {} must be positive",
                            entry.symbol,
                            rule.feature.name(),
                            r.weight
                        ),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PhonemeRules] {
        &self.entries
    }

    /// The built-in table covering the full phoneme inventory
    pub fn built_in() -> &'static RuleSet {
        &BUILT_IN
    }
}

fn r(feature: FeatureKind, min: f32, max: f32, weight: f32) -> Rule {
    Rule {
        feature,
        range: FeatureRange { min, max, weight },
    }
}

fn entry(symbol: &str, rules: Vec<Rule>) -> PhonemeRules {
    PhonemeRules {
        symbol: symbol.to_string(),
        rules,
    }
}

static BUILT_IN: Lazy<RuleSet> = Lazy::new(|| {
    use FeatureKind::*;

    let entries = vec![
        // Rest pose, centered below the physical floor (see module header)
        entry(
            "sil",
            vec![
                r(JawOpening, -0.35, 0.15, 1.0),
                r(MouthHeight, -0.35, 0.15, 1.0),
                r(LipSeparation, -0.40, 0.20, 1.0),
                r(MouthWidth, 0.30, 0.70, 0.5),
            ],
        ),
        // Open vowels
        entry(
            "AA",
            vec![
                r(JawOpening, 0.70, 1.00, 1.2),
                r(MouthHeight, 0.60, 1.00, 1.0),
                r(Roundness, -0.30, 0.30, 0.8),
                r(AspectRatio, 0.45, 0.95, 0.6),
            ],
        ),
        entry(
            "AE",
            vec![
                r(JawOpening, 0.45, 0.85, 1.0),
                r(MouthHeight, 0.45, 0.85, 0.9),
                r(MouthWidth, 0.55, 0.95, 0.8),
                r(Roundness, -0.25, 0.25, 0.6),
                r(Curvature, 0.00, 0.60, 0.4),
            ],
        ),
        entry(
            "AH",
            vec![
                r(JawOpening, 0.30, 0.70, 1.0),
                r(MouthHeight, 0.25, 0.65, 0.9),
                r(Roundness, -0.30, 0.30, 0.5),
            ],
        ),
        entry(
            "AO",
            vec![
                r(JawOpening, 0.45, 0.85, 1.0),
                r(Roundness, 0.40, 0.80, 1.1),
                r(MouthHeight, 0.40, 0.80, 0.8),
                r(MouthWidth, 0.15, 0.55, 0.6),
            ],
        ),
        entry(
            "AW",
            vec![
                r(JawOpening, 0.40, 0.85, 0.9),
                r(Roundness, 0.25, 0.70, 0.8),
                r(MouthHeight, 0.35, 0.80, 0.8),
            ],
        ),
        entry(
            "AY",
            vec![
                r(JawOpening, 0.40, 0.85, 0.9),
                r(MouthHeight, 0.35, 0.80, 0.8),
                r(MouthWidth, 0.45, 0.90, 0.6),
                r(Roundness, -0.30, 0.30, 0.5),
            ],
        ),
        // Mid and front vowels
        entry(
            "EH",
            vec![
                r(JawOpening, 0.30, 0.65, 1.0),
                r(MouthHeight, 0.30, 0.65, 0.9),
                r(MouthWidth, 0.45, 0.85, 0.7),
                r(Roundness, -0.30, 0.30, 0.5),
            ],
        ),
        entry(
            "ER",
            vec![
                r(JawOpening, 0.20, 0.55, 0.9),
                r(Roundness, 0.25, 0.65, 0.9),
                r(MouthHeight, 0.15, 0.50, 0.7),
                r(MouthWidth, 0.20, 0.60, 0.6),
            ],
        ),
        entry(
            "EY",
            vec![
                r(JawOpening, 0.25, 0.60, 0.9),
                r(MouthHeight, 0.25, 0.60, 0.8),
                r(MouthWidth, 0.50, 0.90, 0.8),
                r(Curvature, 0.05, 0.65, 0.5),
            ],
        ),
        entry(
            "IH",
            vec![
                r(JawOpening, 0.15, 0.50, 0.9),
                r(MouthHeight, 0.15, 0.50, 0.8),
                r(MouthWidth, 0.50, 0.90, 0.8),
                r(Roundness, -0.30, 0.20, 0.5),
            ],
        ),
        entry(
            "IY",
            vec![
                r(MouthWidth, 0.60, 1.00, 1.1),
                r(JawOpening, 0.05, 0.40, 0.9),
                r(Curvature, 0.15, 0.85, 0.8),
                r(MouthHeight, 0.10, 0.45, 0.7),
                r(Roundness, -0.30, 0.15, 0.7),
            ],
        ),
        // Rounded vowels
        entry(
            "OW",
            vec![
                r(Roundness, 0.50, 0.90, 1.1),
                r(MouthWidth, 0.10, 0.50, 0.9),
                r(JawOpening, 0.25, 0.65, 0.8),
                r(MouthHeight, 0.25, 0.65, 0.7),
            ],
        ),
        entry(
            "OY",
            vec![
                r(Roundness, 0.40, 0.85, 1.0),
                r(JawOpening, 0.30, 0.70, 0.8),
                r(MouthWidth, 0.15, 0.55, 0.7),
            ],
        ),
        entry(
            "UH",
            vec![
                r(Roundness, 0.40, 0.80, 1.0),
                r(JawOpening, 0.15, 0.50, 0.8),
                r(MouthHeight, 0.15, 0.50, 0.7),
                r(MouthWidth, 0.15, 0.55, 0.6),
            ],
        ),
        entry(
            "UW",
            vec![
                r(Roundness, 0.60, 1.00, 1.2),
                r(MouthWidth, 0.00, 0.35, 1.0),
                r(JawOpening, 0.05, 0.40, 0.8),
                r(MouthHeight, 0.10, 0.45, 0.6),
                r(AspectRatio, 0.45, 0.95, 0.5),
            ],
        ),
        // Bilabial closures: lips pressed, ideal separation is exactly zero
        entry(
            "P",
            vec![
                r(LipSeparation, -0.20, 0.20, 1.3),
                r(MouthHeight, -0.15, 0.20, 1.0),
                r(JawOpening, -0.20, 0.30, 0.8),
                r(Roundness, -0.25, 0.30, 0.4),
            ],
        ),
        entry(
            "B",
            vec![
                r(LipSeparation, -0.20, 0.20, 1.3),
                r(MouthHeight, -0.15, 0.20, 1.0),
                r(JawOpening, -0.20, 0.30, 0.8),
                r(Roundness, -0.25, 0.30, 0.4),
            ],
        ),
        entry(
            "M",
            vec![
                r(LipSeparation, -0.20, 0.20, 1.3),
                r(MouthHeight, -0.15, 0.20, 1.0),
                r(JawOpening, -0.20, 0.30, 0.8),
                r(Roundness, -0.25, 0.30, 0.4),
            ],
        ),
        // Labiodental and dental fricatives: a visible small gap
        entry(
            "F",
            vec![
                r(LipSeparation, 0.05, 0.35, 1.2),
                r(MouthHeight, 0.00, 0.30, 0.9),
                r(JawOpening, 0.05, 0.45, 0.7),
                r(Curvature, -0.50, 0.20, 0.4),
            ],
        ),
        entry(
            "V",
            vec![
                r(LipSeparation, 0.05, 0.35, 1.2),
                r(MouthHeight, 0.00, 0.30, 0.9),
                r(JawOpening, 0.05, 0.45, 0.7),
                r(Curvature, -0.50, 0.20, 0.4),
            ],
        ),
        entry(
            "TH",
            vec![
                r(LipSeparation, 0.10, 0.40, 1.1),
                r(JawOpening, 0.10, 0.50, 0.9),
                r(MouthHeight, 0.05, 0.35, 0.8),
            ],
        ),
        entry(
            "DH",
            vec![
                r(LipSeparation, 0.10, 0.40, 1.1),
                r(JawOpening, 0.10, 0.50, 0.9),
                r(MouthHeight, 0.05, 0.35, 0.8),
            ],
        ),
        // Alveolars
        entry(
            "T",
            vec![
                r(LipSeparation, 0.05, 0.40, 1.0),
                r(JawOpening, 0.10, 0.50, 0.9),
                r(MouthHeight, 0.05, 0.40, 0.7),
                r(MouthWidth, 0.35, 0.75, 0.5),
            ],
        ),
        entry(
            "D",
            vec![
                r(LipSeparation, 0.05, 0.40, 1.0),
                r(JawOpening, 0.10, 0.50, 0.9),
                r(MouthHeight, 0.05, 0.40, 0.7),
                r(MouthWidth, 0.35, 0.75, 0.5),
            ],
        ),
        entry(
            "N",
            vec![
                r(LipSeparation, 0.05, 0.40, 1.0),
                r(JawOpening, 0.10, 0.50, 0.9),
                r(MouthHeight, 0.05, 0.40, 0.7),
                r(MouthWidth, 0.35, 0.75, 0.5),
            ],
        ),
        entry(
            "S",
            vec![
                r(LipSeparation, 0.02, 0.25, 1.2),
                r(MouthHeight, 0.00, 0.25, 0.9),
                r(JawOpening, 0.00, 0.30, 0.8),
                r(MouthWidth, 0.45, 0.85, 0.7),
            ],
        ),
        entry(
            "Z",
            vec![
                r(LipSeparation, 0.02, 0.25, 1.2),
                r(MouthHeight, 0.00, 0.25, 0.9),
                r(JawOpening, 0.00, 0.30, 0.8),
                r(MouthWidth, 0.45, 0.85, 0.7),
            ],
        ),
        entry(
            "L",
            vec![
                r(LipSeparation, 0.15, 0.55, 0.9),
                r(JawOpening, 0.15, 0.55, 0.9),
                r(MouthHeight, 0.10, 0.50, 0.6),
            ],
        ),
        entry(
            "R",
            vec![
                r(Roundness, 0.30, 0.70, 1.0),
                r(LipSeparation, 0.10, 0.45, 0.8),
                r(JawOpening, 0.10, 0.50, 0.6),
            ],
        ),
        // Postalveolars: protruded lips
        entry(
            "SH",
            vec![
                r(Roundness, 0.35, 0.75, 1.0),
                r(LipSeparation, 0.10, 0.45, 0.9),
                r(MouthWidth, 0.15, 0.55, 0.8),
                r(JawOpening, 0.10, 0.50, 0.6),
            ],
        ),
        entry(
            "ZH",
            vec![
                r(Roundness, 0.35, 0.75, 1.0),
                r(LipSeparation, 0.10, 0.45, 0.9),
                r(MouthWidth, 0.15, 0.55, 0.8),
                r(JawOpening, 0.10, 0.50, 0.6),
            ],
        ),
        entry(
            "CH",
            vec![
                r(Roundness, 0.35, 0.75, 1.0),
                r(LipSeparation, 0.10, 0.45, 0.9),
                r(MouthWidth, 0.15, 0.55, 0.8),
                r(JawOpening, 0.10, 0.50, 0.6),
            ],
        ),
        entry(
            "JH",
            vec![
                r(Roundness, 0.35, 0.75, 1.0),
                r(LipSeparation, 0.10, 0.45, 0.9),
                r(MouthWidth, 0.15, 0.55, 0.8),
                r(JawOpening, 0.10, 0.50, 0.6),
            ],
        ),
        // Palatal / velar / glottal
        entry(
            "Y",
            vec![
                r(MouthWidth, 0.50, 0.90, 0.9),
                r(LipSeparation, 0.10, 0.45, 0.8),
                r(JawOpening, 0.05, 0.40, 0.7),
                r(Curvature, 0.00, 0.60, 0.4),
            ],
        ),
        entry(
            "K",
            vec![
                r(JawOpening, 0.15, 0.55, 0.9),
                r(LipSeparation, 0.10, 0.50, 0.8),
                r(MouthHeight, 0.10, 0.45, 0.6),
                r(MouthWidth, 0.30, 0.70, 0.4),
            ],
        ),
        entry(
            "G",
            vec![
                r(JawOpening, 0.15, 0.55, 0.9),
                r(LipSeparation, 0.10, 0.50, 0.8),
                r(MouthHeight, 0.10, 0.45, 0.6),
                r(MouthWidth, 0.30, 0.70, 0.4),
            ],
        ),
        entry(
            "NG",
            vec![
                r(JawOpening, 0.15, 0.55, 0.9),
                r(LipSeparation, 0.10, 0.50, 0.8),
                r(MouthHeight, 0.10, 0.45, 0.6),
                r(MouthWidth, 0.30, 0.70, 0.4),
            ],
        ),
        entry(
            "HH",
            vec![
                r(JawOpening, 0.20, 0.60, 0.8),
                r(LipSeparation, 0.15, 0.55, 0.7),
                r(MouthHeight, 0.15, 0.55, 0.6),
            ],
        ),
        // Labiovelar approximant: tightest rounding of the consonants
        entry(
            "W",
            vec![
                r(Roundness, 0.55, 0.95, 1.2),
                r(MouthWidth, 0.00, 0.35, 1.0),
                r(LipSeparation, 0.05, 0.40, 0.7),
                r(JawOpening, 0.00, 0.35, 0.6),
            ],
        ),
    ];

    RuleSet::new(entries).expect("built-in rule table is well-formed")
});

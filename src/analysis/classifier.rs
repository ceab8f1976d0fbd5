// PhonemeClassifier - heuristic rule-based phoneme classification
//
// This module scores every phoneme in the rule table against one feature
// vector and returns the best candidate plus ranked alternatives. Scoring
// runs in four passes:
//
// 1. Rule pass: weighted proximity to each applicable feature range,
//    normalized by the applicable weight mass.
// 2. Type pass: a mild alignment factor selected by the phoneme's
//    linguistic type, perturbing rankings without discarding the rule score.
// 3. Linguistic pass: small multiplicative boosts for physically expected
//    correlations (open jaw for vowels, sealed lips for bilabials,
//    stillness for silence, high roundness for rounded vowels).
// 4. Fuzzy pass (optional): stabilizes borderline frames by boosting the
//    ambiguous middle band and cross-feeding phonetically similar pairs.
//
// The classifier is deterministic for identical input and configuration and
// has no side effects. Empty or garbage input resolves to the silence
// phoneme with confidence 0; that is the defined fallback, not an error.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::analysis::features::{FeatureKind, FeatureVector};
use crate::analysis::rules::{PhonemeRules, RuleSet};
use crate::analysis::{ClassificationResult, PhonemeScore};
use crate::config::{ClassifierConfig, ClassifierTuning};
use crate::phonemes::{self, Manner, Phoneme, PhonemeType};

/// Score band considered ambiguous by the fuzzy pass
const FUZZY_BAND: (f32, f32) = (0.4, 0.6);

/// Minimum score for both sides of a similar pair to cross-feed
const SIMILARITY_FLOOR: f32 = 0.45;

/// Jaw opening above which a vowel counts as wide open
const OPEN_JAW: f32 = 0.65;

/// Lip separation below which bilabials count as sealed
const SEALED_LIPS: f32 = 0.10;

/// Mean movement below which the mouth counts as still
const STILLNESS: f32 = 0.08;

/// Roundness above which a rounded vowel gets its boost
const ROUNDED: f32 = 0.60;

/// Phonetically similar pairs that flicker against each other frame to
/// frame. Cross-feeding a little score keeps borderline frames from
/// alternating between the two.
static SIMILAR_PAIRS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("P", "B"),
        ("B", "M"),
        ("T", "D"),
        ("D", "N"),
        ("S", "Z"),
        ("SH", "ZH"),
        ("CH", "JH"),
        ("F", "V"),
        ("TH", "DH"),
        ("K", "G"),
        ("AA", "AH"),
        ("AO", "OW"),
        ("OW", "UW"),
        ("UW", "UH"),
        ("IY", "IH"),
        ("EH", "AE"),
    ]
});

#[derive(Debug, Clone)]
struct Candidate {
    symbol: String,
    score: f32,
}

/// Rule-based phoneme classifier
///
/// Holds an immutable rule table (shared between instances) and the
/// classifier section of the configuration. Construct one per bound model;
/// instances with different tables can coexist.
pub struct PhonemeClassifier {
    rules: Arc<RuleSet>,
    config: ClassifierConfig,
}

impl PhonemeClassifier {
    /// Create a classifier over the built-in rule table
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_rules(config, Arc::new(RuleSet::built_in().clone()))
    }

    /// Create a classifier over a custom validated rule table
    pub fn with_rules(config: ClassifierConfig, rules: Arc<RuleSet>) -> Self {
        Self { rules, config }
    }

    /// Classify one feature vector
    ///
    /// # Returns
    /// The best candidate with confidence and ranked alternatives. Falls
    /// back to silence for empty input, for input no rule applies to, and
    /// for best scores below the configured confidence threshold.
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        if features.is_empty() {
            return ClassificationResult::silence(features.timestamp_ms);
        }

        let candidates = self.score_all(features);
        if candidates.is_empty() {
            return ClassificationResult::silence(features.timestamp_ms);
        }

        if self.config.debug_mode {
            let table: Vec<String> = candidates
                .iter()
                .take(5)
                .map(|c| format!("{}={:.3}", c.symbol, c.score))
                .collect();
            log::debug!(
                "[Classifier] t={}ms top: {}",
                features.timestamp_ms,
                table.join(" ")
            );
        }

        let best = &candidates[0];
        let confidence = best.score.clamp(0.0, 1.0);

        if confidence < self.config.confidence_threshold {
            // Low confidence resolves to silence; the ranked list is kept so
            // hosts can still render what almost won.
            if self.config.debug_mode {
                log::debug!(
                    "[Classifier] best {} at {:.3} below threshold {:.3}, resolving to silence",
                    best.symbol,
                    confidence,
                    self.config.confidence_threshold
                );
            }
            return ClassificationResult {
                phoneme: phonemes::SILENCE.to_string(),
                confidence,
                alternatives: Self::ranked(&candidates, 5),
                timestamp_ms: features.timestamp_ms,
            };
        }

        ClassificationResult {
            phoneme: best.symbol.clone(),
            confidence,
            alternatives: Self::ranked(&candidates[1..], 5),
            timestamp_ms: features.timestamp_ms,
        }
    }

    /// Ranked candidate list without the silence fallback logic
    ///
    /// # Arguments
    /// * `count` - Maximum number of entries to return
    pub fn alternatives(&self, features: &FeatureVector, count: usize) -> Vec<PhonemeScore> {
        Self::ranked(&self.score_all(features), count)
    }

    fn ranked(candidates: &[Candidate], count: usize) -> Vec<PhonemeScore> {
        candidates
            .iter()
            .take(count)
            .map(|c| PhonemeScore {
                phoneme: c.symbol.clone(),
                score: c.score.clamp(0.0, 1.0),
            })
            .collect()
    }

    /// Run all scoring passes and sort candidates best-first
    fn score_all(&self, features: &FeatureVector) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(self.rules.entries().len());

        for entry in self.rules.entries() {
            let Some(phoneme) = phonemes::lookup(&entry.symbol) else {
                // Unreachable for validated tables; tolerate anyway.
                log::warn!("[Classifier] rules name unknown phoneme {:?}", entry.symbol);
                continue;
            };
            let Some(raw) = Self::rule_score(entry, features) else {
                continue;
            };

            let mut score = raw * self.type_alignment(phoneme, features);
            score *= self.linguistic_boost(phoneme, features);

            candidates.push(Candidate {
                symbol: entry.symbol.clone(),
                score,
            });
        }

        if self.config.enable_fuzzy_matching {
            self.fuzzy_pass(&mut candidates);
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        candidates
    }

    /// Pass 1: weighted proximity over applicable rules
    ///
    /// Inside a range the rule awards proximity to the range center scaled
    /// by its weight; outside it subtracts distance times half the weight.
    /// Normalizing by the applicable weight mass puts a vector sitting on
    /// every center at exactly 1.0. Returns None when no rule applied.
    fn rule_score(entry: &PhonemeRules, features: &FeatureVector) -> Option<f32> {
        let mut sum = 0.0;
        let mut weight_mass = 0.0;
        let mut applicable = 0usize;

        for rule in &entry.rules {
            let Some(value) = features.get(rule.feature) else {
                continue;
            };
            let range = &rule.range;
            let half_range = range.half_range();
            if half_range <= 0.0 {
                // Unvalidated tables can arrive via deserialization
                continue;
            }
            if range.contains(value) {
                let proximity = 1.0 - (value - range.center()).abs() / half_range;
                sum += proximity * range.weight;
            } else {
                sum -= range.distance_outside(value) * range.weight * 0.5;
            }
            weight_mass += range.weight;
            applicable += 1;
        }

        (applicable > 0).then(|| sum / weight_mass)
    }

    /// Pass 2: type-specific feature alignment in [0.95, 1.10]
    fn type_alignment(&self, phoneme: &Phoneme, features: &FeatureVector) -> f32 {
        let mut evidence = Vec::with_capacity(3);

        match phoneme.kind {
            PhonemeType::Vowel => {
                if let Some(v) = features.get(FeatureKind::JawOpening) {
                    evidence.push(v);
                }
                if let Some(v) = features.get(FeatureKind::MouthHeight) {
                    evidence.push(v);
                }
                if let Some(v) = features.get(FeatureKind::Roundness) {
                    evidence.push(if phoneme.rounded { v } else { 1.0 - v });
                }
            }
            PhonemeType::Consonant => {
                if let Some(v) = features.get(FeatureKind::LipSeparation) {
                    evidence.push(1.0 - v);
                }
                if let Some(v) = features.get(FeatureKind::MouthHeight) {
                    evidence.push(1.0 - v);
                }
            }
            PhonemeType::Silence => {
                for kind in [
                    FeatureKind::JawOpening,
                    FeatureKind::MouthHeight,
                    FeatureKind::LipSeparation,
                ] {
                    if let Some(v) = features.get(kind) {
                        evidence.push(1.0 - v);
                    }
                }
            }
        }

        if evidence.is_empty() {
            return 1.0;
        }
        let emphasis = (evidence.iter().sum::<f32>() / evidence.len() as f32).clamp(0.0, 1.0);
        0.95 + 0.15 * emphasis
    }

    /// Pass 3: boosts for physically expected correlations
    fn linguistic_boost(&self, phoneme: &Phoneme, features: &FeatureVector) -> f32 {
        let tuning: &ClassifierTuning = &self.config.tuning;
        let mut boost = 1.0;

        if phoneme.is_vowel() {
            if let Some(jaw) = features.get(FeatureKind::JawOpening) {
                if jaw >= OPEN_JAW {
                    boost *= tuning.open_vowel_boost;
                }
            }
            if phoneme.rounded {
                if let Some(roundness) = features.get(FeatureKind::Roundness) {
                    if roundness >= ROUNDED {
                        boost *= tuning.rounded_vowel_boost;
                    }
                }
            }
        }

        // Sealed lips favor the bilabial closures, not the approximant W
        if phoneme.is_bilabial() && phoneme.manner != Some(Manner::Approximant) {
            if let Some(separation) = features.get(FeatureKind::LipSeparation) {
                if separation <= SEALED_LIPS {
                    boost *= tuning.bilabial_closure_boost;
                }
            }
        }

        if phoneme.is_silence() {
            let mut movement = Vec::with_capacity(3);
            for kind in [
                FeatureKind::JawOpening,
                FeatureKind::MouthHeight,
                FeatureKind::LipSeparation,
            ] {
                if let Some(v) = features.get(kind) {
                    movement.push(v);
                }
            }
            if !movement.is_empty() {
                let mean = movement.iter().sum::<f32>() / movement.len() as f32;
                if mean <= STILLNESS {
                    boost *= tuning.silence_stillness_boost;
                }
            }
        }

        boost
    }

    /// Pass 4: fuzzy stabilization of borderline frames
    fn fuzzy_pass(&self, candidates: &mut [Candidate]) {
        let tuning = &self.config.tuning;
        let band_half = (FUZZY_BAND.1 - FUZZY_BAND.0) / 2.0;
        let band_center = (FUZZY_BAND.0 + FUZZY_BAND.1) / 2.0;

        for candidate in candidates.iter_mut() {
            let s = candidate.score;
            if s >= FUZZY_BAND.0 && s <= FUZZY_BAND.1 {
                candidate.score += tuning.fuzzy_band_boost * (1.0 - (s - band_center).abs() / band_half);
            }
        }

        // Cross-feed on a snapshot so the feed order cannot matter
        let snapshot: std::collections::HashMap<String, f32> = candidates
            .iter()
            .map(|c| (c.symbol.clone(), c.score))
            .collect();

        for candidate in candidates.iter_mut() {
            for (a, b) in SIMILAR_PAIRS.iter() {
                let partner = if candidate.symbol == *a {
                    *b
                } else if candidate.symbol == *b {
                    *a
                } else {
                    continue;
                };
                let own = snapshot.get(&candidate.symbol).copied().unwrap_or(0.0);
                let Some(&partner_score) = snapshot.get(partner) else {
                    continue;
                };
                if own >= SIMILARITY_FLOOR && partner_score >= SIMILARITY_FLOOR {
                    candidate.score += tuning.similarity_feed * partner_score;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

// Analysis module - classification pipeline from facial geometry to visemes
//
// This module hosts the stateless half of the lip sync pipeline: the
// normalized feature vector produced by the external landmark detector, the
// per-phoneme geometric rule set, the phoneme classifier, and the
// phoneme-to-viseme collapse.
//
// Pipeline: FeatureVector -> PhonemeClassifier -> Viseme
//
// Everything here is pure with respect to mesh state; nothing in this module
// touches renderer resources, which is what makes the classification logic
// unit-testable without a renderer.

use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod features;
pub mod rules;
pub mod viseme;

/// One ranked candidate from a classification pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemeScore {
    /// Phoneme symbol ("AA", "P", "sil")
    pub phoneme: String,
    /// Final score after all passes, clamped to [0.0, 1.0]
    pub score: f32,
}

/// Classification result for one feature vector
///
/// Broadcast to the host for debug overlays and consumed by the orchestrator
/// to drive blending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning phoneme symbol; "sil" for empty input or low confidence
    pub phoneme: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Remaining candidates, best first
    pub alternatives: Vec<PhonemeScore>,
    /// Timestamp carried over from the feature vector
    pub timestamp_ms: u64,
}

impl ClassificationResult {
    /// The defined fallback for input that matched nothing
    pub fn silence(timestamp_ms: u64) -> Self {
        Self {
            phoneme: crate::phonemes::SILENCE.to_string(),
            confidence: 0.0,
            alternatives: Vec::new(),
            timestamp_ms,
        }
    }
}

//! Configuration surface for the lip sync pipeline
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration without recompilation. Classification thresholds,
//! blending behavior, and the morph-target naming scheme can be adjusted via
//! the config file for rapid experimentation against a given model.
//!
//! Invalid values are rejected by [LipSyncConfig::validate] with a
//! descriptive [ConfigError]; they are never silently clamped.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::rig::NamingScheme;

/// Complete lip sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LipSyncConfig {
    pub classifier: ClassifierConfig,
    pub blending: BlendingConfig,
    pub rig: RigConfig,
}

/// Phoneme classifier parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Score below which classification falls back to the silence phoneme
    pub confidence_threshold: f32,
    /// Enable the fuzzy stabilization pass (ambiguity band + similar pairs)
    pub enable_fuzzy_matching: bool,
    /// Verbose per-frame classification tracing at debug level
    pub debug_mode: bool,
    /// Empirically tuned boost constants
    #[serde(default)]
    pub tuning: ClassifierTuning,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.35,
            enable_fuzzy_matching: true,
            debug_mode: false,
            tuning: ClassifierTuning::default(),
        }
    }
}

/// Classifier boost constants
///
/// These values were tuned by visual inspection against reference meshes,
/// not derived analytically. Re-tune them against your own target model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierTuning {
    /// Boost for vowels produced with a wide-open jaw
    pub open_vowel_boost: f32,
    /// Boost for bilabial consonants with near-zero lip separation
    pub bilabial_closure_boost: f32,
    /// Boost for silence when the mouth is nearly still
    pub silence_stillness_boost: f32,
    /// Boost for rounded vowels with high measured roundness
    pub rounded_vowel_boost: f32,
    /// Extra score granted inside the ambiguous middle band
    pub fuzzy_band_boost: f32,
    /// Fraction of a similar phoneme's score cross-fed to its partner
    pub similarity_feed: f32,
}

impl Default for ClassifierTuning {
    fn default() -> Self {
        Self {
            open_vowel_boost: 1.10,
            bilabial_closure_boost: 1.15,
            silence_stillness_boost: 1.20,
            rounded_vowel_boost: 1.10,
            fuzzy_band_boost: 0.04,
            similarity_feed: 0.05,
        }
    }
}

/// Animation blending parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendingConfig {
    /// Per-tick multiplicative falloff applied to unreinforced influences
    pub decay_factor: f32,
    /// Cap on simultaneously nonzero morph targets per mesh
    pub max_influencers: usize,
    /// Overall intensity scale applied to resolved recipe weights
    pub intensity: f32,
}

impl Default for BlendingConfig {
    fn default() -> Self {
        Self {
            decay_factor: 0.85,
            max_influencers: 8,
            intensity: 1.0,
        }
    }
}

/// Model binding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigConfig {
    /// Which morph-target vocabulary the bound model uses
    pub naming_scheme: NamingScheme,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            naming_scheme: NamingScheme::Reallusion,
        }
    }
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            blending: BlendingConfig::default(),
            rig: RigConfig::default(),
        }
    }
}

impl LipSyncConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults if the file is missing or
    /// unparseable. Validation is a separate step: construction of the
    /// engine calls [LipSyncConfig::validate] and surfaces any error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Validate every numeric field against its documented range
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is usable
    /// * `Err(ConfigError)` - First offending field, with its value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        if !(0.0..=1.0).contains(&c.confidence_threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: c.confidence_threshold,
            });
        }

        let b = &self.blending;
        if !(0.0..1.0).contains(&b.decay_factor) {
            return Err(ConfigError::DecayOutOfRange {
                value: b.decay_factor,
            });
        }
        if b.max_influencers == 0 {
            return Err(ConfigError::MaxInfluencersZero);
        }
        if !(b.intensity > 0.0 && b.intensity <= 1.0) {
            return Err(ConfigError::IntensityOutOfRange { value: b.intensity });
        }

        let t = &c.tuning;
        for (name, value, lo, hi) in [
            ("open_vowel_boost", t.open_vowel_boost, 1.0, 2.0),
            ("bilabial_closure_boost", t.bilabial_closure_boost, 1.0, 2.0),
            ("silence_stillness_boost", t.silence_stillness_boost, 1.0, 2.0),
            ("rounded_vowel_boost", t.rounded_vowel_boost, 1.0, 2.0),
            ("fuzzy_band_boost", t.fuzzy_band_boost, 0.0, 0.5),
            ("similarity_feed", t.similarity_feed, 0.0, 0.5),
        ] {
            if !(lo..=hi).contains(&value) {
                return Err(ConfigError::TuningOutOfRange { name, value });
            }
        }

        Ok(())
    }
}

// FeatureVector - normalized geometric measurements of the mouth region
//
// The external landmark detector reduces each camera frame to a handful of
// scalar measurements. All of them are normalized before they reach this
// crate: lengths against the face bounding box to [0.0, 1.0], curvature as
// a signed smile/frown value in [-1.0, 1.0].
//
// A measurement the detector could not produce (occlusion, profile view) is
// simply absent. Absence means "rule not applicable" downstream; it is
// never an error and never scored as zero.

use serde::{Deserialize, Serialize};

/// Identifies one scalar measurement of the mouth region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Horizontal mouth extent
    MouthWidth,
    /// Vertical mouth extent
    MouthHeight,
    /// Height/width ratio, remapped so 0.5 is the resting ratio
    AspectRatio,
    /// Chin drop relative to the resting pose
    JawOpening,
    /// Gap between inner lip contours
    LipSeparation,
    /// Lip protrusion/pursing
    Roundness,
    /// Mouth corner curvature; -1.0 frown, +1.0 smile
    Curvature,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 7] = [
        FeatureKind::MouthWidth,
        FeatureKind::MouthHeight,
        FeatureKind::AspectRatio,
        FeatureKind::JawOpening,
        FeatureKind::LipSeparation,
        FeatureKind::Roundness,
        FeatureKind::Curvature,
    ];

    /// Curvature is the only signed feature
    pub fn min_valid(self) -> f32 {
        match self {
            FeatureKind::Curvature => -1.0,
            _ => 0.0,
        }
    }

    pub fn max_valid(self) -> f32 {
        1.0
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::MouthWidth => "mouth_width",
            FeatureKind::MouthHeight => "mouth_height",
            FeatureKind::AspectRatio => "aspect_ratio",
            FeatureKind::JawOpening => "jaw_opening",
            FeatureKind::LipSeparation => "lip_separation",
            FeatureKind::Roundness => "roundness",
            FeatureKind::Curvature => "curvature",
        }
    }

    fn index(self) -> usize {
        match self {
            FeatureKind::MouthWidth => 0,
            FeatureKind::MouthHeight => 1,
            FeatureKind::AspectRatio => 2,
            FeatureKind::JawOpening => 3,
            FeatureKind::LipSeparation => 4,
            FeatureKind::Roundness => 5,
            FeatureKind::Curvature => 6,
        }
    }
}

/// Normalized measurements for one detector frame
///
/// Built once per frame with chained [FeatureVector::with] calls and treated
/// as immutable afterwards.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Detector timestamp in milliseconds
    pub timestamp_ms: u64,
    values: [Option<f32>; 7],
}

impl FeatureVector {
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            values: [None; 7],
        }
    }

    /// Attach one measurement
    ///
    /// An out-of-range value is logged and treated as missing rather than
    /// clamped; a clamped garbage value would score like a confident
    /// measurement.
    pub fn with(mut self, kind: FeatureKind, value: f32) -> Self {
        if value.is_finite() && value >= kind.min_valid() && value <= kind.max_valid() {
            self.values[kind.index()] = Some(value);
        } else {
            log::warn!(
                "[Features] dropping out-of-range {} = {} (valid [{}, {}])",
                kind.name(),
                value,
                kind.min_valid(),
                kind.max_valid()
            );
        }
        self
    }

    pub fn get(&self, kind: FeatureKind) -> Option<f32> {
        self.values[kind.index()]
    }

    /// Number of measurements present
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }
}

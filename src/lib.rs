// Lip Sync Engine Core - real-time phoneme classification and viseme blending
// for 3D avatar mouth animation.

// Module declarations
pub mod analysis;
pub mod blending;
pub mod config;
pub mod engine;
pub mod error;
pub mod phonemes;
pub mod rig;
pub mod telemetry;

// Re-exports for convenience
pub use analysis::classifier::PhonemeClassifier;
pub use analysis::features::FeatureVector;
pub use analysis::viseme::Viseme;
pub use analysis::ClassificationResult;
pub use blending::{AnimationBlender, BlendState, MorphTargetBackend};
pub use config::LipSyncConfig;
pub use engine::{EngineState, LipSyncEngine};
pub use rig::{MeshChannel, MorphTargetBinding, MorphTargetDirectory, NamingScheme};

/// Initialize logging for hosts that do not install their own subscriber.
///
/// Respects `RUST_LOG`-style filtering via the environment. Safe to call more
/// than once; later calls are ignored.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

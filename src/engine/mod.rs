//! Engine module housing the lip sync orchestrator.
//!
//! The orchestrator drives the pipeline once per rendered frame (or per
//! phoneme event): pull a feature vector or timed phoneme, classify, map,
//! resolve, and hand the result to the blender. It owns the state machine
//! `Idle -> Warming -> Ready -> Playing -> (Ready | Idle)` and is the only
//! component allowed to move blend state through the renderer backend.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::analysis::classifier::PhonemeClassifier;
use crate::analysis::features::FeatureVector;
use crate::analysis::viseme::Viseme;
use crate::analysis::ClassificationResult;
use crate::blending::{AnimationBlender, BlendState, MorphTargetBackend};
use crate::config::LipSyncConfig;
use crate::error::{log_config_error, ConfigError, RigError};
use crate::rig::{BlendShapeResolver, MeshChannel, MorphTargetDirectory};
use crate::telemetry::LipSyncEvent;

mod inbox;
pub mod sequence;

pub use inbox::{feature_channel, FeatureInbox, FeatureProducer, DEFAULT_INBOX_CAPACITY};
pub use sequence::PhonemeTiming;

use sequence::{SequencePlayer, SequenceStep};

/// Broadcast buffer for telemetry subscribers
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Orchestrator lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No model bound
    Idle,
    /// Morph target directory accepted, warm-up pending
    Warming,
    /// Awaiting feature vectors or a sequence
    Ready,
    /// Consuming a phoneme-timed sequence
    Playing,
}

impl EngineState {
    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Idle => "Idle",
            EngineState::Warming => "Warming",
            EngineState::Ready => "Ready",
            EngineState::Playing => "Playing",
        }
    }
}

/// Drives the full pipeline against one bound model
///
/// Single-threaded by design: one `tick` runs at a time, visemes reach the
/// blend state in production order, and the only cross-thread surfaces are
/// the detector inbox and the telemetry broadcast.
pub struct LipSyncEngine {
    config: LipSyncConfig,
    classifier: PhonemeClassifier,
    resolver: BlendShapeResolver,
    blender: AnimationBlender,
    directory: Option<MorphTargetDirectory>,
    state: EngineState,
    inbox: Option<FeatureInbox>,
    pending: Option<FeatureVector>,
    sequence: Option<SequencePlayer>,
    events_tx: broadcast::Sender<LipSyncEvent>,
}

impl LipSyncEngine {
    /// Build an engine from validated configuration
    ///
    /// # Returns
    /// * `Err(ConfigError)` - Configuration rejected; nothing is constructed
    pub fn new(config: LipSyncConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log_config_error(&err, "LipSyncEngine::new");
            return Err(err);
        }

        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            classifier: PhonemeClassifier::new(config.classifier.clone()),
            resolver: BlendShapeResolver::new(config.rig.naming_scheme, config.blending.intensity),
            blender: AnimationBlender::new(config.blending.clone()),
            directory: None,
            state: EngineState::Idle,
            inbox: None,
            pending: None,
            sequence: None,
            events_tx,
            config,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &LipSyncConfig {
        &self.config
    }

    /// Subscribe to telemetry events
    pub fn subscribe(&self) -> broadcast::Receiver<LipSyncEvent> {
        self.events_tx.subscribe()
    }

    /// Snapshot of the blender's influence state
    pub fn blend_state(&self) -> BlendState {
        self.blender.current_state()
    }

    /// Create the detector-side feature handle
    ///
    /// The handle can be moved to the detector's capture thread; vectors
    /// cross over a lock-free ring with latest-wins semantics. Calling this
    /// again replaces the previous channel.
    pub fn detector_handle(&mut self) -> FeatureProducer {
        let (producer, inbox) = feature_channel(DEFAULT_INBOX_CAPACITY);
        self.inbox = Some(inbox);
        producer
    }

    /// Hand one feature vector to the engine directly (queue-of-one)
    ///
    /// Single-threaded hosts can skip the ring buffer; a vector delivered
    /// before the next tick overwrites the previous one.
    pub fn ingest_features(&mut self, features: FeatureVector) {
        self.pending = Some(features);
    }

    /// Accept the morph target directory discovered by the host
    ///
    /// Idle -> Warming. Re-binding while still Warming is allowed so the
    /// caller can retry after the mesh finishes loading.
    pub fn bind_model(&mut self, directory: MorphTargetDirectory) -> Result<(), RigError> {
        match self.state {
            EngineState::Idle | EngineState::Warming => {
                self.directory = Some(directory);
                self.transition(EngineState::Warming);
                Ok(())
            }
            _ => Err(RigError::AlreadyBound),
        }
    }

    /// Run the one-time shader warm-up
    ///
    /// Warming -> Ready. An empty directory fails and leaves the state in
    /// Warming; the caller retries once the renderer reports morph targets.
    pub fn warm_up(&mut self, backend: &mut dyn MorphTargetBackend) -> Result<(), RigError> {
        match self.state {
            EngineState::Idle => return Err(RigError::NotBound),
            EngineState::Warming => {}
            _ => {
                return Err(RigError::NotReady {
                    state: self.state.name().to_string(),
                })
            }
        }

        let directory = self.directory.as_ref().ok_or(RigError::NotBound)?;
        if directory.is_empty() {
            return Err(RigError::NoMorphTargets);
        }

        self.blender.warm_up(directory, backend);
        self.emit(LipSyncEvent::WarmedUp {
            face_targets: directory.len(MeshChannel::Face),
            tongue_targets: directory.len(MeshChannel::Tongue),
        });
        self.transition(EngineState::Ready);
        Ok(())
    }

    /// Start a phoneme-timed sequence (bypasses classification)
    ///
    /// Ready -> Playing. The sequence clock anchors on the first tick.
    pub fn play_sequence(&mut self, entries: Vec<PhonemeTiming>) -> Result<(), RigError> {
        match self.state {
            EngineState::Ready => {}
            EngineState::Playing => return Err(RigError::AlreadyPlaying),
            _ => {
                return Err(RigError::NotReady {
                    state: self.state.name().to_string(),
                })
            }
        }
        if entries.is_empty() {
            return Err(RigError::EmptySequence);
        }

        log::info!("[Engine] playing sequence of {} phonemes", entries.len());
        self.sequence = Some(SequencePlayer::new(entries));
        self.transition(EngineState::Playing);
        Ok(())
    }

    /// Advance the pipeline by one host frame
    ///
    /// In Ready: classify the newest feature vector (if any) and blend it.
    /// In Playing: resolve the sequence entry active at `now_ms`; feature
    /// vectors arriving meanwhile are drained and discarded. Every tick
    /// applies the trailing decay even without new input.
    pub fn tick(
        &mut self,
        now_ms: u64,
        backend: &mut dyn MorphTargetBackend,
    ) -> Result<(), RigError> {
        match self.state {
            EngineState::Ready => {
                let newest = self.take_newest_features();
                match newest {
                    Some(features) => self.classify_and_apply(&features, backend),
                    None => self.blender.apply_frame(&[], backend),
                }
                Ok(())
            }
            EngineState::Playing => {
                // Later vectors never interleave with a driven sequence
                let _ = self.take_newest_features();
                self.tick_sequence(now_ms, backend);
                Ok(())
            }
            _ => Err(RigError::NotReady {
                state: self.state.name().to_string(),
            }),
        }
    }

    /// Stop playback and unbind
    ///
    /// Terminal transition back to Idle; zeroes every influence inside one
    /// batch bracket so no partial writes are left behind.
    pub fn stop(&mut self, backend: &mut dyn MorphTargetBackend) {
        self.blender.reset(backend);
        self.sequence = None;
        self.pending = None;
        self.directory = None;
        if self.state != EngineState::Idle {
            self.transition(EngineState::Idle);
        }
    }

    fn take_newest_features(&mut self) -> Option<FeatureVector> {
        let from_ring = self.inbox.as_mut().and_then(FeatureInbox::latest);
        let from_call = self.pending.take();
        match (from_ring, from_call) {
            (Some(a), Some(b)) => Some(if b.timestamp_ms >= a.timestamp_ms { b } else { a }),
            (a, b) => a.or(b),
        }
    }

    fn classify_and_apply(
        &mut self,
        features: &FeatureVector,
        backend: &mut dyn MorphTargetBackend,
    ) {
        let result: ClassificationResult = self.classifier.classify(features);
        self.emit(LipSyncEvent::Classification {
            phoneme: result.phoneme.clone(),
            confidence: result.confidence,
            timestamp_ms: result.timestamp_ms,
        });

        let viseme = Viseme::from_phoneme(&result.phoneme);
        self.apply_viseme(viseme, result.timestamp_ms, backend);
    }

    fn tick_sequence(&mut self, now_ms: u64, backend: &mut dyn MorphTargetBackend) {
        let step = match self.sequence.as_mut() {
            Some(player) => player.step(now_ms),
            None => SequenceStep::Finished,
        };

        match step {
            SequenceStep::Active(phoneme) => {
                let viseme = Viseme::from_phoneme(&phoneme);
                self.apply_viseme(viseme, now_ms, backend);
            }
            SequenceStep::Gap => {
                self.blender.apply_frame(&[], backend);
            }
            SequenceStep::Finished => {
                log::info!("[Engine] sequence finished");
                self.sequence = None;
                self.blender.apply_frame(&[], backend);
                self.transition(EngineState::Ready);
            }
        }
    }

    fn apply_viseme(&mut self, viseme: Viseme, timestamp_ms: u64, backend: &mut dyn MorphTargetBackend) {
        let bindings = match self.directory.as_ref() {
            Some(directory) => self.resolver.resolve(viseme, directory),
            None => Vec::new(),
        };

        if self.config.classifier.debug_mode {
            tracing::debug!(
                timestamp_ms,
                ?viseme,
                bindings = bindings.len(),
                "applying viseme frame"
            );
        }

        self.blender.apply_frame(&bindings, backend);
        self.emit(LipSyncEvent::FrameApplied {
            viseme,
            bindings: bindings.len(),
            timestamp_ms,
        });
    }

    fn transition(&mut self, to: EngineState) {
        let from = self.state;
        if from == to {
            return;
        }
        log::info!("[Engine] {} -> {}", from.name(), to.name());
        self.state = to;
        self.emit(LipSyncEvent::StateChanged { from, to });
    }

    fn emit(&self, event: LipSyncEvent) {
        // Nobody listening is fine
        let _ = self.events_tx.send(event);
    }
}

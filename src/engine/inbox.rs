// FeatureInbox - lock-free detector-to-engine handoff
//
// The landmark detector runs on its own capture cadence and hands completed
// feature vectors across a bounded SPSC ring buffer. Blend state is
// cumulative and order-dependent, so only one vector is classified per
// tick: the consumer drains the ring and keeps the newest entry. A slow
// render loop therefore skips stale frames instead of queueing them, and
// the detector thread never blocks or allocates.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::analysis::features::FeatureVector;

/// Default ring capacity; a handful of detector frames of slack
pub const DEFAULT_INBOX_CAPACITY: usize = 8;

/// Detector-side handle
pub struct FeatureProducer {
    producer: Producer<FeatureVector>,
}

impl FeatureProducer {
    /// Offer one feature vector
    ///
    /// # Returns
    /// * `true` - Vector accepted
    /// * `false` - Ring full (engine has not ticked for a while); the frame
    ///   is dropped, which is the correct latest-wins behavior
    pub fn offer(&mut self, features: FeatureVector) -> bool {
        match self.producer.push(features) {
            Ok(()) => true,
            Err(_) => {
                log::debug!("[Inbox] ring full, dropping detector frame");
                false
            }
        }
    }
}

/// Engine-side handle
pub struct FeatureInbox {
    consumer: Consumer<FeatureVector>,
}

impl FeatureInbox {
    /// Drain the ring and return the newest vector, if any
    pub fn latest(&mut self) -> Option<FeatureVector> {
        let mut newest = None;
        while let Ok(features) = self.consumer.pop() {
            newest = Some(features);
        }
        newest
    }
}

/// Create a connected producer/inbox pair
pub fn feature_channel(capacity: usize) -> (FeatureProducer, FeatureInbox) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        FeatureProducer { producer },
        FeatureInbox { consumer },
    )
}

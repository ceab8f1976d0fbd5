// Timed phoneme sequences - text/TTS driven playback
//
// A phoneme-timed sequence enters the pipeline at the viseme stage,
// bypassing classification. Playback is driven by the host's frame clock:
// every tick asks the player which entry is active at the current time.
// There are no timers or delayed callbacks anywhere; a host that pauses its
// render loop pauses the mouth with it.

use serde::{Deserialize, Serialize};

/// One entry of a phoneme-timed sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemeTiming {
    /// Phoneme symbol ("AA", "P", "sil")
    pub phoneme: String,
    /// Onset relative to sequence start
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl PhonemeTiming {
    pub fn new(phoneme: impl Into<String>, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            phoneme: phoneme.into(),
            start_ms,
            duration_ms,
        }
    }

    fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// What the player found at the current time
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SequenceStep {
    /// An entry is active
    Active(String),
    /// Between entries; the mouth decays toward rest
    Gap,
    /// Past the last entry
    Finished,
}

/// Steps through a sequence on the host frame clock
///
/// The first tick anchors the sequence start; subsequent ticks are resolved
/// against that anchor. Entries are kept sorted by onset.
pub(crate) struct SequencePlayer {
    entries: Vec<PhonemeTiming>,
    base_ms: Option<u64>,
    cursor: usize,
}

impl SequencePlayer {
    pub fn new(mut entries: Vec<PhonemeTiming>) -> Self {
        entries.sort_by_key(|e| e.start_ms);
        Self {
            entries,
            base_ms: None,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve the entry active at `now_ms`
    pub fn step(&mut self, now_ms: u64) -> SequenceStep {
        let base = *self.base_ms.get_or_insert(now_ms);
        let t = now_ms.saturating_sub(base);

        while self.cursor < self.entries.len() && self.entries[self.cursor].end_ms() <= t {
            self.cursor += 1;
        }

        if self.cursor >= self.entries.len() {
            return SequenceStep::Finished;
        }

        let entry = &self.entries[self.cursor];
        if entry.start_ms <= t {
            SequenceStep::Active(entry.phoneme.clone())
        } else {
            SequenceStep::Gap
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> SequencePlayer {
        SequencePlayer::new(vec![
            PhonemeTiming::new("HH", 0, 80),
            PhonemeTiming::new("EH", 80, 100),
            // 40ms gap
            PhonemeTiming::new("L", 220, 90),
            PhonemeTiming::new("OW", 310, 150),
        ])
    }

    #[test]
    fn test_steps_through_entries_on_frame_clock() {
        let mut player = player();

        // First tick anchors the clock at 1000
        assert_eq!(player.step(1000), SequenceStep::Active("HH".to_string()));
        assert_eq!(player.step(1050), SequenceStep::Active("HH".to_string()));
        assert_eq!(player.step(1100), SequenceStep::Active("EH".to_string()));
        assert_eq!(player.step(1200), SequenceStep::Gap);
        assert_eq!(player.step(1250), SequenceStep::Active("L".to_string()));
        assert_eq!(player.step(1400), SequenceStep::Active("OW".to_string()));
        assert_eq!(player.step(1460), SequenceStep::Finished);
        assert_eq!(player.step(2000), SequenceStep::Finished);
    }

    #[test]
    fn test_slow_frame_rate_skips_entries() {
        let mut player = player();
        assert_eq!(player.step(0), SequenceStep::Active("HH".to_string()));
        // A 300ms hitch lands inside the fourth entry
        assert_eq!(player.step(320), SequenceStep::Active("OW".to_string()));
    }

    #[test]
    fn test_unsorted_entries_are_ordered_by_onset() {
        let mut player = SequencePlayer::new(vec![
            PhonemeTiming::new("B", 100, 50),
            PhonemeTiming::new("A", 0, 100),
        ]);
        assert_eq!(player.step(0), SequenceStep::Active("A".to_string()));
        assert_eq!(player.step(120), SequenceStep::Active("B".to_string()));
    }

    #[test]
    fn test_empty_sequence_finishes_immediately() {
        let mut player = SequencePlayer::new(vec![]);
        assert_eq!(player.step(0), SequenceStep::Finished);
    }
}

//! Keyboard focus across the buttons that can still be pressed.
//!
//! The ring is rebuilt from the transcript on every use: the buttons of the
//! latest live option set, then every download offer still `Ready`. Focus is
//! remembered as a [`Target`], so it survives new entries being appended and
//! drops out naturally once its button goes inert.

use crate::core::transcript::{DownloadStatus, Entry, Transcript};

/// A pressable button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Choice { set: usize, choice: usize },
    Download(usize),
}

/// Every pressable button, in focus order.
pub fn targets(transcript: &Transcript) -> Vec<Target> {
    let mut targets: Vec<Target> = transcript
        .live_options()
        .map(|set| {
            (0..set.labels.len())
                .map(|choice| Target::Choice { set: set.id, choice })
                .collect()
        })
        .unwrap_or_default();

    targets.extend(transcript.entries().iter().filter_map(|entry| match entry {
        Entry::Download(offer) if offer.status == DownloadStatus::Ready => {
            Some(Target::Download(offer.id))
        }
        _ => None,
    }));
    targets
}

#[derive(Debug, Default)]
pub struct FocusRing {
    current: Option<Target>,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused target, if it can still be pressed.
    pub fn current(&self, transcript: &Transcript) -> Option<Target> {
        self.current
            .filter(|target| targets(transcript).contains(target))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn next(&mut self, transcript: &Transcript) {
        self.step(transcript, true);
    }

    pub fn prev(&mut self, transcript: &Transcript) {
        self.step(transcript, false);
    }

    fn step(&mut self, transcript: &Transcript, forward: bool) {
        let ring = targets(transcript);
        if ring.is_empty() {
            self.current = None;
            return;
        }
        let position = self
            .current
            .and_then(|current| ring.iter().position(|t| *t == current));
        let index = match (position, forward) {
            (Some(i), true) => (i + 1) % ring.len(),
            (Some(i), false) => (i + ring.len() - 1) % ring.len(),
            (None, true) => 0,
            (None, false) => ring.len() - 1,
        };
        self.current = Some(ring[index]);
    }
}

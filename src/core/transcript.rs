//! # Transcript
//!
//! The visible conversation, top to bottom. Append-only: entries are never
//! removed or reordered. Two kinds of entry change in place after being added:
//!
//! - an [`OptionSet`] is resolved (a choice is made, or the prompt is retired)
//! - a [`DownloadOffer`] moves through `Ready → Saving → Saved | Failed`
//!
//! ```text
//! Transcript
//! ├── entries: Vec<Entry>
//! │   ├── Message { text, sender }
//! │   ├── Options(OptionSet)      // buttons under a bot prompt
//! │   └── Download(DownloadOffer) // one-shot report action
//! └── revision: u64               // bumped on every change
//! ```

use std::path::PathBuf;

use crate::core::state::ComplaintRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message { text: String, sender: Sender },
    Options(OptionSet),
    Download(DownloadOffer),
}

/// A row of mutually exclusive choices tied to one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    pub id: usize,
    pub labels: Vec<String>,
    /// Index of the chosen label, once a choice was made.
    pub chosen: Option<usize>,
    live: bool,
}

impl OptionSet {
    /// Whether the buttons still accept a choice.
    pub fn is_live(&self) -> bool {
        self.live
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Ready,
    Saving,
    Saved(PathBuf),
    Failed,
}

/// One-shot report action, bound to the record that existed when it was offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOffer {
    pub id: usize,
    pub record: ComplaintRecord,
    pub status: DownloadStatus,
}

impl DownloadOffer {
    pub fn label(&self) -> &'static str {
        match self.status {
            DownloadStatus::Ready => "Download Complaint Report",
            DownloadStatus::Saving => "Saving Report...",
            DownloadStatus::Saved(_) => "Report Downloaded",
            DownloadStatus::Failed => "Report Unavailable",
        }
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_option_id: usize,
    next_offer_id: usize,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change counter. Adapters compare it between frames to decide on a redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn push_message(&mut self, text: impl Into<String>, sender: Sender) {
        self.entries.push(Entry::Message {
            text: text.into(),
            sender,
        });
        self.revision += 1;
    }

    /// Append a bot prompt followed by its option buttons. Returns the set id.
    pub fn push_options(&mut self, prompt: impl Into<String>, labels: &[&str]) -> usize {
        self.push_message(prompt, Sender::Bot);
        let id = self.next_option_id;
        self.next_option_id += 1;
        self.entries.push(Entry::Options(OptionSet {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            chosen: None,
            live: true,
        }));
        self.revision += 1;
        id
    }

    /// Append a download action bound to a snapshot of `record`. Returns the offer id.
    pub fn push_download(&mut self, record: ComplaintRecord) -> usize {
        let id = self.next_offer_id;
        self.next_offer_id += 1;
        self.entries.push(Entry::Download(DownloadOffer {
            id,
            record,
            status: DownloadStatus::Ready,
        }));
        self.revision += 1;
        id
    }

    pub fn option_set(&self, id: usize) -> Option<&OptionSet> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Options(set) if set.id == id => Some(set),
            _ => None,
        })
    }

    pub fn offer(&self, id: usize) -> Option<&DownloadOffer> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Download(offer) if offer.id == id => Some(offer),
            _ => None,
        })
    }

    /// The most recent option set that still accepts a choice.
    pub fn live_options(&self) -> Option<&OptionSet> {
        self.entries.iter().rev().find_map(|entry| match entry {
            Entry::Options(set) if set.live => Some(set),
            _ => None,
        })
    }

    /// Resolve a live option set and return the chosen label.
    ///
    /// `None` if the set is unknown, already resolved, or `choice` is out of range.
    /// Resolving makes the whole row inert.
    pub fn choose(&mut self, id: usize, choice: usize) -> Option<String> {
        let set = self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Options(set) if set.id == id => Some(set),
            _ => None,
        })?;
        if !set.live {
            return None;
        }
        let label = set.labels.get(choice)?.clone();
        set.live = false;
        set.chosen = Some(choice);
        self.revision += 1;
        Some(label)
    }

    /// Disable every option row that is still live, without recording a choice.
    pub fn retire_live_options(&mut self) {
        let mut changed = false;
        for entry in &mut self.entries {
            if let Entry::Options(set) = entry
                && set.live
            {
                set.live = false;
                changed = true;
            }
        }
        if changed {
            self.revision += 1;
        }
    }

    /// Move a `Ready` offer to `Saving` and hand back its record. One-shot.
    pub fn claim_offer(&mut self, id: usize) -> Option<ComplaintRecord> {
        let offer = self.offer_mut(id)?;
        if offer.status != DownloadStatus::Ready {
            return None;
        }
        offer.status = DownloadStatus::Saving;
        let record = offer.record.clone();
        self.revision += 1;
        Some(record)
    }

    pub fn set_offer_status(&mut self, id: usize, status: DownloadStatus) {
        if let Some(offer) = self.offer_mut(id) {
            offer.status = status;
            self.revision += 1;
        }
    }

    fn offer_mut(&mut self, id: usize) -> Option<&mut DownloadOffer> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Download(offer) if offer.id == id => Some(offer),
            _ => None,
        })
    }

    /// Text of the last message from `sender`, if any.
    pub fn last_message_from(&self, sender: Sender) -> Option<&str> {
        self.entries.iter().rev().find_map(|entry| match entry {
            Entry::Message { text, sender: s } if *s == sender => Some(text.as_str()),
            _ => None,
        })
    }
}

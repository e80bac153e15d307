//! Bounded command history: append-only log, FIFO eviction, LIFO display.

use acavox_common::protocol::CommandResponse;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

pub const HISTORY_CAPACITY: usize = 10;

/// Settled outcome of a command. Exactly one of response/failure, never both.
#[derive(Debug, Clone)]
pub enum Outcome {
    Response(CommandResponse),
    Failure(String),
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// Monotonic request id, shared with the stale-response check.
    pub seq: u64,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
    /// `None` while the command is in flight.
    pub outcome: Option<Outcome>,
}

impl HistoryEntry {
    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }
}

#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pending entry at the front, evicting the oldest beyond
    /// capacity. Returns the entry id.
    pub fn begin(&mut self, seq: u64, text: &str) -> Uuid {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            seq,
            text: text.to_string(),
            submitted_at: Utc::now(),
            outcome: None,
        };
        let id = entry.id;
        self.entries.push_front(entry);
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_back();
        }
        id
    }

    /// Settle the entry with the given sequence number. Returns false if the
    /// entry was evicted or already settled; entries never settle twice.
    pub fn settle(&mut self, seq: u64, outcome: Outcome) -> bool {
        match self.entries.iter_mut().find(|e| e.seq == seq) {
            Some(entry) if entry.outcome.is_none() => {
                entry.outcome = Some(outcome);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// 0-based from the newest entry.
    pub fn nth_newest(&self, n: usize) -> Option<&HistoryEntry> {
        self.entries.get(n)
    }
}

//! Reveal lifecycle events.
//!
//! `{EVENT=name}` tokens and the terminal end-of-text notification are
//! queued as they fire and drained by the host once per step. Ordering is
//! preserved: multiple events revealed between two `advance` calls come
//! out in markup order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Event emitted while revealing a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevealEvent {
    /// A `{EVENT=name}` token's anchor index was revealed.
    Named {
        name: String,
        /// Glyph index the token was anchored at.
        index: usize,
    },
    /// The reveal cursor reached the end of the sequence. Fired exactly
    /// once per restart.
    Finished,
}

/// FIFO queue of reveal events awaiting the host.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<RevealEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RevealEvent) {
        self.events.push_back(event);
    }

    /// Drain all queued events in order. Call once per host step.
    pub fn drain(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

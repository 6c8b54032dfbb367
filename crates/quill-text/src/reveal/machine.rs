//! The typewriter reveal state machine.
//!
//! ```text
//! Idle ── restart ──► Running ◄── resume ── Paused
//!                        │  ▲                  ▲
//!                        │  └──── pause ───────┘
//!                        ▼
//!                    Finished   (skip_to_end reaches this from any state)
//! ```
//!
//! The machine references a [`Layout`] but never owns one; the cursor is
//! clamped against the layout on every advance, so swapping a layout for a
//! shorter one mid-animation degrades to finishing early instead of
//! indexing out of bounds.

use crate::layout::Layout;
use crate::markup::interpreter::{AnchoredToken, AnchoredTokenKind};
use crate::reveal::easing::EasingFunction;
use crate::reveal::events::{EventQueue, RevealEvent};

/// Slack for per-glyph timing comparisons, well below a perceptible dt.
const TIME_EPSILON: f32 = 1e-5;

/// Playback status of a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealStatus {
    /// Created but not started.
    #[default]
    Idle,
    Running,
    /// Host-driven pause; internal wait tokens do not enter this state.
    Paused,
    /// Cursor reached the end of the sequence.
    Finished,
}

/// Tunables for the reveal, typically sourced from `quill-config`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingConfig {
    /// Seconds per glyph at speed multiplier 1.0.
    pub interval: f32,
    /// Cap on glyphs revealed by one `advance` call, so a stalled frame
    /// doesn't dump the whole text at once.
    pub max_glyphs_per_tick: usize,
    /// `skip_to_end` fires only the terminal event instead of every
    /// intermediate `{EVENT=...}`.
    pub suppress_events_on_skip: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            interval: 0.05,
            max_glyphs_per_tick: 32,
            suppress_events_on_skip: false,
        }
    }
}

impl From<&quill_config::TypingSection> for TypingConfig {
    fn from(section: &quill_config::TypingSection) -> Self {
        Self {
            interval: section.interval,
            max_glyphs_per_tick: section.max_glyphs_per_tick,
            suppress_events_on_skip: section.suppress_events_on_skip,
        }
    }
}

/// Time-stepped reveal over one layout's flat glyph sequence.
#[derive(Debug, Clone)]
pub struct RevealState {
    config: TypingConfig,
    status: RevealStatus,
    /// Playback seconds accumulated while Running (wall-clock dt scaled
    /// by the speed multiplier in effect).
    elapsed: f32,
    /// Glyphs fully revealed.
    cursor: usize,
    /// Current playback speed multiplier (`{SPEED=n}`).
    speed: f32,
    /// Pacing curve for the in-flight glyph (`{EASE=name}`).
    ease: EasingFunction,
    /// Anchored timing tokens, sorted by glyph index.
    tokens: Vec<AnchoredToken>,
    /// First unconsumed token.
    next_token: usize,
    /// Remaining `{WAIT=s}` delay, consumed before the cursor moves again.
    wait_remaining: f32,
    /// Partial progress (seconds) toward the next glyph.
    acc: f32,
    events: EventQueue,
    finished_fired: bool,
}

impl RevealState {
    pub fn new(config: TypingConfig) -> Self {
        Self {
            config,
            status: RevealStatus::Idle,
            elapsed: 0.0,
            cursor: 0,
            speed: 1.0,
            ease: EasingFunction::default(),
            tokens: Vec::new(),
            next_token: 0,
            wait_remaining: 0.0,
            acc: 0.0,
            events: EventQueue::new(),
            finished_fired: false,
        }
    }

    /// Install the anchored tokens for the current markup. Tokens are
    /// sorted by anchor index; markup order is preserved within an index.
    pub fn set_tokens(&mut self, mut tokens: Vec<AnchoredToken>) {
        tokens.sort_by_key(|t| t.index);
        self.tokens = tokens;
        self.next_token = 0;
    }

    /// Replace the anchored tokens after a relayout without disturbing
    /// playback. Tokens anchored at or before the cursor count as already
    /// consumed: speed and ease changes are re-applied so the pace
    /// survives the swap, but waits and events are not replayed.
    pub fn retarget(&mut self, tokens: Vec<AnchoredToken>) {
        // Whether tokens anchored exactly at the cursor had been consumed
        // under the previous token set (false right after a restart, before
        // the first advance reaches them).
        let cursor_served = self
            .tokens
            .get(self.next_token)
            .map_or(true, |t| t.index > self.cursor);
        self.set_tokens(tokens);
        if self.status == RevealStatus::Idle {
            return;
        }
        while self.next_token < self.tokens.len() {
            let token = &self.tokens[self.next_token];
            if token.index > self.cursor || (token.index == self.cursor && !cursor_served) {
                break;
            }
            match &token.kind {
                AnchoredTokenKind::Speed(mult) => self.speed = *mult,
                AnchoredTokenKind::Ease(ease) => self.ease = *ease,
                AnchoredTokenKind::Wait(_) | AnchoredTokenKind::Event(_) => {}
            }
            self.next_token += 1;
        }
    }

    pub fn status(&self) -> RevealStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == RevealStatus::Finished
    }

    /// Raw cursor value. Prefer [`Self::revealed_count`] when a layout is
    /// at hand; the raw value may exceed a swapped-in shorter layout.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor clamped to the layout's glyph sequence.
    pub fn revealed_count(&self, layout: &Layout) -> usize {
        self.cursor.min(layout.glyph_count())
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Eased 0..=1 pop-in progress of the glyph at the cursor. Fully
    /// revealed glyphs report 1.0.
    pub fn glyph_progress(&self) -> f32 {
        if self.status == RevealStatus::Finished {
            return 1.0;
        }
        let cost = self.glyph_cost();
        if cost <= 0.0 {
            return 1.0;
        }
        self.ease.evaluate(self.acc / cost)
    }

    /// (Re)start from the beginning, from any state.
    pub fn restart(&mut self) {
        self.status = RevealStatus::Running;
        self.elapsed = 0.0;
        self.cursor = 0;
        self.speed = 1.0;
        self.ease = EasingFunction::default();
        self.next_token = 0;
        self.wait_remaining = 0.0;
        self.acc = 0.0;
        self.events = EventQueue::new();
        self.finished_fired = false;
    }

    /// Host-driven pause. Idempotent; a no-op outside Running.
    pub fn pause(&mut self) {
        if self.status == RevealStatus::Running {
            self.status = RevealStatus::Paused;
        }
    }

    /// Host-driven resume. Idempotent; a no-op outside Paused.
    pub fn resume(&mut self) {
        if self.status == RevealStatus::Paused {
            self.status = RevealStatus::Running;
        }
    }

    /// Jump the cursor to the end, firing remaining events (in order)
    /// unless configured to suppress them, then transition to Finished.
    /// Valid from any state.
    pub fn skip_to_end(&mut self, layout: &Layout) {
        let len = layout.glyph_count();
        while self.next_token < self.tokens.len() {
            let token = self.tokens[self.next_token].clone();
            self.next_token += 1;
            if let AnchoredTokenKind::Event(name) = token.kind {
                if !self.config.suppress_events_on_skip {
                    self.events.push(RevealEvent::Named {
                        name,
                        index: token.index.min(len),
                    });
                }
            }
        }
        self.cursor = len;
        self.wait_remaining = 0.0;
        self.acc = 0.0;
        self.finish();
    }

    /// Step the reveal by `dt` seconds of host time.
    ///
    /// A no-op unless Running. Consumes anchored tokens as their index is
    /// revealed; wait tokens delay the cursor without leaving Running.
    pub fn advance(&mut self, dt: f32, layout: &Layout) {
        if self.status != RevealStatus::Running || dt < 0.0 {
            return;
        }
        self.elapsed += dt * self.speed;
        let len = layout.glyph_count();
        // Layout may have been swapped for a shorter one.
        self.cursor = self.cursor.min(len);

        let mut budget = dt;
        let mut revealed_this_tick = 0usize;

        loop {
            self.consume_tokens_at_cursor(len);

            if self.cursor >= len {
                self.finish();
                return;
            }
            if budget <= 0.0 {
                return;
            }
            if self.wait_remaining > 0.0 {
                let used = budget.min(self.wait_remaining);
                self.wait_remaining -= used;
                budget -= used;
                continue;
            }
            if revealed_this_tick >= self.config.max_glyphs_per_tick.max(1) {
                // Cap hit: drop the leftover budget so a stall doesn't
                // reveal the whole text next frame.
                return;
            }

            let cost = self.glyph_cost();
            let needed = (cost - self.acc).max(0.0);
            // Tolerance absorbs the float residue of repeated subtraction,
            // so a dt of exactly N intervals reveals N glyphs.
            if budget + TIME_EPSILON >= needed {
                budget = (budget - needed).max(0.0);
                self.acc = 0.0;
                self.cursor += 1;
                revealed_this_tick += 1;
            } else {
                self.acc += budget;
                return;
            }
        }
    }

    /// Drain queued events in order. Call once per host step.
    pub fn drain_events(&mut self) -> impl Iterator<Item = RevealEvent> + '_ {
        self.events.drain()
    }

    /// Seconds to reveal one glyph at the current speed.
    fn glyph_cost(&self) -> f32 {
        if self.speed > 0.0 {
            self.config.interval / self.speed
        } else {
            self.config.interval
        }
    }

    /// Consume every token anchored at or before the cursor, in order.
    fn consume_tokens_at_cursor(&mut self, len: usize) {
        while self.next_token < self.tokens.len() {
            let token = &self.tokens[self.next_token];
            if token.index.min(len) > self.cursor {
                break;
            }
            let token = token.clone();
            self.next_token += 1;
            match token.kind {
                AnchoredTokenKind::Wait(seconds) => self.wait_remaining += seconds,
                AnchoredTokenKind::Speed(mult) => self.speed = mult,
                AnchoredTokenKind::Event(name) => self.events.push(RevealEvent::Named {
                    name,
                    index: token.index.min(len),
                }),
                AnchoredTokenKind::Ease(ease) => self.ease = ease,
            }
        }
    }

    fn finish(&mut self) {
        self.status = RevealStatus::Finished;
        if !self.finished_fired {
            self.finished_fired = true;
            self.events.push(RevealEvent::Finished);
        }
    }
}

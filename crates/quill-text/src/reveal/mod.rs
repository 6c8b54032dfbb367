//! Typewriter reveal: easing curves, host-facing events, and the
//! time-stepped state machine that walks a layout's glyph sequence.

pub mod easing;
pub mod events;
pub mod machine;

pub use easing::EasingFunction;
pub use events::{EventQueue, RevealEvent};
pub use machine::{RevealState, RevealStatus, TypingConfig};

#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ColorPoint`**: One color sample plus how long to hold it; a negative hold ends the list
//! - **`Sequence`**: A labeled point list with a default strategy and a strategy-specific bonus
//! - **`SequenceStore`**: Fixed-capacity table of sequences, looked up by label
//! - **`StrategyId`**: How a sequence is played (`points`, `single`, `slowp`, `rainbow`)
//! - **`NeoSequencer`**: Non-blocking playback engine; call `advance()` from your main loop
//! - **`SequencePayload`**: A sequence definition loaded into a user slot at runtime
//! - **`LedStrip`**: Trait to implement for your strip hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`RandomSource`**: Trait (or closure) supplying random numbers
//!
//! Strips receive 8-bit `Srgb<u8>` colors. Log output goes through the `log`
//! facade; install a logger in your firmware to see it.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod builtin;
pub mod colors;
pub mod command;
pub mod loader;
pub mod sequence;
pub mod sequencer;
pub mod store;
pub mod strategy;
pub mod time;
pub mod types;

pub use colors::{COLOR_OFF, FULL_BRIGHT};
pub use command::{SelectRequest, SequencerCommand};
pub use loader::{PointPayload, SequencePayload, parse_payload};
pub use sequence::{Sequence, SequenceBuilder};
pub use sequencer::{DefaultSequencer, LedStrip, NeoSequencer, PlaybackState, RandomSource};
pub use store::{SequenceStore, SlotId};
pub use strategy::{StrategyId, resolve};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{ColorPoint, Selection, SequencerError, SlotKind};

//! Strategy registry and the per-phase callbacks each strategy provides.
//!
//! A strategy is a row in [`STRATEGIES`]: a name from the external contract,
//! an identifier, and one callback per playback phase. The engine looks the
//! row up by identifier on every tick and calls the callback for the current
//! phase; the callback returns the next phase. Adding a strategy means adding
//! a [`StrategyId`] variant and a table row.

pub mod points;
pub mod pulse;
pub mod rainbow;

use crate::sequence::point_at;
use crate::sequencer::{LedStrip, PlaybackState, RandomSource};
use crate::store::SlotId;
use crate::types::{ColorPoint, SequencerError};
use palette::Srgb;

/// Closed set of playback strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StrategyId {
    /// Loop through the point list forever.
    Points,
    /// Play the point list a number of times, then stop.
    Single,
    /// Breathe between two endpoint colors with random flicker.
    SlowPulse,
    /// Scroll a rainbow across the whole strip.
    Rainbow,
}

impl StrategyId {
    /// The name used by selection requests and sequence definitions.
    pub fn name(self) -> &'static str {
        descriptor(self).name
    }
}

/// Start callback. The flag asks the strategy to clear the strip first.
pub(crate) type StartFn = fn(&mut Frame<'_>, bool) -> PlaybackState;

/// Callback for every other phase.
pub(crate) type PhaseFn = fn(&mut Frame<'_>) -> PlaybackState;

/// A registry row.
pub struct StrategyDescriptor {
    pub name: &'static str,
    pub id: StrategyId,
    pub(crate) start: StartFn,
    pub(crate) wait: PhaseFn,
    pub(crate) write: PhaseFn,
    pub(crate) stopping: PhaseFn,
    pub(crate) stopped: PhaseFn,
}

/// The registry. Row order matches [`StrategyId`] discriminants.
pub static STRATEGIES: [StrategyDescriptor; 4] = [
    StrategyDescriptor {
        name: "points",
        id: StrategyId::Points,
        start: points::start,
        wait: points::wait,
        write: points::write,
        stopping: release,
        stopped: idle,
    },
    StrategyDescriptor {
        name: "single",
        id: StrategyId::Single,
        start: points::start_single,
        wait: points::wait_single,
        write: points::write_single,
        stopping: release,
        stopped: idle,
    },
    StrategyDescriptor {
        name: "slowp",
        id: StrategyId::SlowPulse,
        start: pulse::start,
        wait: pulse::wait,
        write: pulse::write,
        stopping: release,
        stopped: idle,
    },
    StrategyDescriptor {
        name: "rainbow",
        id: StrategyId::Rainbow,
        start: rainbow::start,
        wait: rainbow::wait,
        write: rainbow::write,
        stopping: release,
        stopped: idle,
    },
];

/// Looks up a strategy by exact, case-sensitive name.
///
/// # Errors
/// Returns `StrategyUndefined` for any name not in the registry.
pub fn resolve(name: &str) -> Result<StrategyId, SequencerError> {
    STRATEGIES
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.id)
        .ok_or(SequencerError::StrategyUndefined)
}

/// Returns the registry row for a strategy.
pub fn descriptor(id: StrategyId) -> &'static StrategyDescriptor {
    &STRATEGIES[id as usize]
}

/// Per-run state owned by the cursor and reset on every selection.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunState {
    pub(crate) point_index: usize,
    pub(crate) last_update_ms: u64,
    pub(crate) repeats_left: u32,
    pub(crate) pulse: pulse::PulseState,
    pub(crate) hue: u32,
}

/// Everything a callback may touch during one tick.
pub(crate) struct Frame<'a> {
    pub(crate) strip: &'a mut dyn LedStrip,
    pub(crate) random: &'a mut dyn RandomSource,
    pub(crate) points: &'a [ColorPoint],
    pub(crate) bonus: &'a str,
    pub(crate) now_ms: u64,
    pub(crate) run: &'a mut RunState,
    pub(crate) selected: &'a mut Option<SlotId>,
}

impl Frame<'_> {
    /// Point at `index`; past the first terminator reads as the terminator.
    pub(crate) fn point(&self, index: usize) -> ColorPoint {
        point_at(self.points, index)
    }

    /// Point under the cursor.
    pub(crate) fn current_point(&self) -> ColorPoint {
        self.point(self.run.point_index)
    }

    /// Milliseconds since the last render.
    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.run.last_update_ms)
    }

    /// Records this tick as the last render time.
    pub(crate) fn mark(&mut self) {
        self.run.last_update_ms = self.now_ms;
    }

    /// Sets every pixel to `color` and renders the frame.
    pub(crate) fn fill(&mut self, color: Srgb<u8>) {
        for index in 0..self.strip.pixel_count() {
            self.strip.set_pixel(index, color);
        }
        self.strip.render();
    }

    /// Turns the strip dark.
    pub(crate) fn blank(&mut self) {
        self.strip.clear();
        self.strip.render();
    }
}

/// STOPPING for every strategy: go dark and release the cursor so the next
/// selection of the same label starts over.
fn release(frame: &mut Frame<'_>) -> PlaybackState {
    frame.blank();
    *frame.selected = None;
    PlaybackState::Stopped
}

fn idle(_frame: &mut Frame<'_>) -> PlaybackState {
    PlaybackState::Stopped
}

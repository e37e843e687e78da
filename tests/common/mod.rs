//! Shared test infrastructure for neo-sequencer integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use neo_sequencer::{LedStrip, NeoSequencer, SequenceStore, Srgb, TimeDuration, TimeInstant, TimeSource};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0.saturating_sub(earlier.0))
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Strip
// ============================================================================

pub const STRIP_LEN: usize = 4;

/// Mock strip that records every rendered frame
pub struct MockStrip {
    buffer: [Srgb<u8>; STRIP_LEN],
    frames: Vec<[Srgb<u8>; STRIP_LEN]>,
}

impl MockStrip {
    pub fn new() -> Self {
        Self {
            buffer: [BLACK; STRIP_LEN],
            frames: Vec::new(),
        }
    }

    /// Every frame sent to the hardware, oldest first
    pub fn frames(&self) -> &[[Srgb<u8>; STRIP_LEN]] {
        &self.frames
    }

    pub fn last_frame(&self) -> [Srgb<u8>; STRIP_LEN] {
        self.frames.last().copied().unwrap_or([BLACK; STRIP_LEN])
    }

    /// Color of the first pixel in the last rendered frame
    pub fn shown(&self) -> Srgb<u8> {
        self.last_frame()[0]
    }

    pub fn is_dark(&self) -> bool {
        self.last_frame().iter().all(|c| *c == BLACK)
    }

    /// First-pixel color of each frame, with consecutive repeats collapsed
    pub fn distinct_colors(&self) -> Vec<Srgb<u8>> {
        let mut colors: Vec<Srgb<u8>> = Vec::new();
        for frame in &self.frames {
            if colors.last() != Some(&frame[0]) {
                colors.push(frame[0]);
            }
        }
        colors
    }

    pub fn clear_history(&mut self) {
        self.frames.clear();
    }
}

impl LedStrip for MockStrip {
    fn set_pixel(&mut self, index: usize, color: Srgb<u8>) {
        if let Some(pixel) = self.buffer.get_mut(index) {
            *pixel = color;
        }
    }

    fn render(&mut self) {
        self.frames.push(self.buffer);
    }

    fn clear(&mut self) {
        self.buffer = [BLACK; STRIP_LEN];
    }

    fn pixel_count(&self) -> usize {
        STRIP_LEN
    }
}

// ============================================================================
// Mock Random Source
// ============================================================================

/// Random source replaying a fixed script, then repeating its last value
pub struct ScriptedRandom {
    values: Vec<u32>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl neo_sequencer::RandomSource for ScriptedRandom {
    fn next_u32(&mut self) -> u32 {
        let value = self
            .values
            .get(self.next)
            .or(self.values.last())
            .copied()
            .unwrap_or(0);
        self.next += 1;
        value
    }
}

// ============================================================================
// Sequencer helpers
// ============================================================================

pub type TestSequencer<'t> = NeoSequencer<'t, TestInstant, MockStrip, MockTimeSource, ScriptedRandom, 12, 128>;

/// Sequencer over the built-in library with a fresh strip and clock
pub fn sequencer(timer: &MockTimeSource) -> TestSequencer<'_> {
    sequencer_with_random(timer, &[0])
}

pub fn sequencer_with_random<'t>(timer: &'t MockTimeSource, random: &[u32]) -> TestSequencer<'t> {
    let store = SequenceStore::with_builtins().unwrap();
    TestSequencer::new(MockStrip::new(), timer, ScriptedRandom::new(random), store)
}

/// Ticks until the engine reports `Stopped` or `max_ticks` is reached,
/// moving the clock `step_ms` before every tick. Returns the ticks used.
pub fn run_until_stopped(seq: &mut TestSequencer<'_>, timer: &MockTimeSource, step_ms: u64, max_ticks: usize) -> usize {
    for tick in 1..=max_ticks {
        timer.advance(step_ms);
        if seq.advance() == neo_sequencer::PlaybackState::Stopped {
            return tick;
        }
    }
    max_ticks
}

// ============================================================================
// Colors
// ============================================================================

pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);
pub const RED: Srgb<u8> = Srgb::new(255, 0, 0);
pub const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

pub fn rgb(r: u8, g: u8, b: u8) -> Srgb<u8> {
    Srgb::new(r, g, b)
}

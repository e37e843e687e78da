//! Sequence playback engine.
//!
//! Provides [`NeoSequencer`], which owns a strip, a sequence store and the
//! playback cursor, and advances the current sequence one phase per call to
//! [`NeoSequencer::advance`]. Also defines the [`LedStrip`] and
//! [`RandomSource`] hardware abstractions.

use crate::command::SequencerCommand;
use crate::loader::{self, SequencePayload};
use crate::store::{SequenceStore, SlotId};
use crate::strategy::{self, Frame, RunState, StrategyId};
use crate::time::{TimeInstant, TimeSource, millis_since};
use crate::types::{Selection, SequencerError};
use palette::Srgb;

/// Slot count of [`DefaultSequencer`].
pub const DEFAULT_SEQUENCES: usize = 12;

/// Points per sequence of [`DefaultSequencer`].
pub const DEFAULT_POINTS: usize = 128;

/// Trait for abstracting addressable LED strip hardware.
///
/// Implement this for your strip driver (WS2812 over SPI/RMT, a simulator,
/// ...). Pixel writes go to a frame buffer; nothing is shown until
/// [`render`](LedStrip::render). Handle hardware errors internally.
pub trait LedStrip {
    /// Sets one pixel in the frame buffer. Out-of-range indices are ignored.
    fn set_pixel(&mut self, index: usize, color: Srgb<u8>);

    /// Sends the frame buffer to the hardware.
    fn render(&mut self);

    /// Sets every pixel in the frame buffer to off.
    fn clear(&mut self);

    /// Number of pixels on the strip.
    fn pixel_count(&self) -> usize;
}

/// Source of random numbers for strategies that need them.
///
/// Any `FnMut() -> u32` closure works, e.g. `|| rng.random()` around a
/// hardware RNG.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

impl<F: FnMut() -> u32> RandomSource for F {
    fn next_u32(&mut self) -> u32 {
        self()
    }
}

/// Playback phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// Nothing is rendering. Strip is dark.
    Stopped,
    /// Clear the strip on the next tick, then stop.
    Stopping,
    /// Initialize the run and render the first frame.
    Start,
    /// Time gate before the next frame.
    Wait,
    /// Render the next frame.
    Write,
}

#[derive(Debug, Clone)]
struct Cursor {
    selected: Option<SlotId>,
    strategy: StrategyId,
    state: PlaybackState,
    clear_on_start: bool,
    run: RunState,
}

impl Cursor {
    fn idle() -> Self {
        Self {
            selected: None,
            strategy: StrategyId::Points,
            state: PlaybackState::Stopped,
            clear_on_start: false,
            run: RunState::default(),
        }
    }
}

/// Plays named sequences from a [`SequenceStore`] on an LED strip.
///
/// Single-threaded and non-blocking: call [`advance`](Self::advance) from
/// your main loop as often as you like. Waiting phases compare the clock
/// against the last render time and return immediately. A long gap between
/// calls moves one frame forward; skipped frames are not replayed.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - LED strip implementation type
/// * `T` - Time source implementation type
/// * `R` - Random source implementation type
/// * `SEQS` - Maximum number of sequences in the store
/// * `POINTS` - Maximum number of points per sequence
pub struct NeoSequencer<
    't,
    I: TimeInstant,
    S: LedStrip,
    T: TimeSource<I>,
    R: RandomSource,
    const SEQS: usize,
    const POINTS: usize,
> {
    strip: S,
    time_source: &'t T,
    random: R,
    store: SequenceStore<SEQS, POINTS>,
    cursor: Cursor,
    epoch: I,
}

/// [`NeoSequencer`] sized for the stock firmware.
pub type DefaultSequencer<'t, I, S, T, R> =
    NeoSequencer<'t, I, S, T, R, DEFAULT_SEQUENCES, DEFAULT_POINTS>;

impl<'t, I, S, T, R, const SEQS: usize, const POINTS: usize> NeoSequencer<'t, I, S, T, R, SEQS, POINTS>
where
    I: TimeInstant,
    S: LedStrip,
    T: TimeSource<I>,
    R: RandomSource,
{
    /// Creates a stopped sequencer and turns the strip off.
    pub fn new(mut strip: S, time_source: &'t T, random: R, store: SequenceStore<SEQS, POINTS>) -> Self {
        strip.clear();
        strip.render();

        Self {
            strip,
            time_source,
            random,
            store,
            cursor: Cursor::idle(),
            epoch: time_source.now(),
        }
    }

    /// Runs one playback tick.
    ///
    /// Reads the clock once and performs at most one phase transition.
    /// Returns the phase the engine is in afterwards.
    pub fn advance(&mut self) -> PlaybackState {
        let now_ms = millis_since(self.epoch, self.time_source.now());
        let descriptor = strategy::descriptor(self.cursor.strategy);
        let state = self.cursor.state;
        let clear = self.cursor.clear_on_start;

        let (points, bonus) = match self.cursor.selected.and_then(|id| self.store.get(id)) {
            Some(sequence) => (sequence.points(), sequence.bonus()),
            None => (&[][..], ""),
        };

        let mut frame = Frame {
            strip: &mut self.strip,
            random: &mut self.random,
            points,
            bonus,
            now_ms,
            run: &mut self.cursor.run,
            selected: &mut self.cursor.selected,
        };

        let next = match state {
            PlaybackState::Start => (descriptor.start)(&mut frame, clear),
            PlaybackState::Wait => (descriptor.wait)(&mut frame),
            PlaybackState::Write => (descriptor.write)(&mut frame),
            PlaybackState::Stopping => (descriptor.stopping)(&mut frame),
            PlaybackState::Stopped => (descriptor.stopped)(&mut frame),
        };

        if state == PlaybackState::Start {
            self.cursor.clear_on_start = false;
        }
        if next != state && !matches!(next, PlaybackState::Wait | PlaybackState::Write) {
            log::debug!("{}: {:?} -> {:?}", descriptor.name, state, next);
        }
        self.cursor.state = next;
        next
    }

    /// Selects a sequence by label.
    ///
    /// `strategy` overrides the sequence's default strategy; `None` or an
    /// empty name uses the default. Selecting the label that is already
    /// playing is a no-op. After a stop has completed (or while one is
    /// pending) the same label starts over from its first point.
    ///
    /// # Errors
    /// * `NotFound` - No slot has this label
    /// * `StrategyUndefined` - The strategy name is not registered
    ///
    /// On error the cursor is unchanged.
    pub fn select_sequence(&mut self, label: &str, strategy: Option<&str>) -> Result<Selection, SequencerError> {
        let Some(slot) = self.store.find(label) else {
            log::warn!("select: no sequence labeled {:?}", label);
            return Err(SequencerError::NotFound);
        };

        if self.is_playing(slot) {
            return Ok(Selection::Unchanged);
        }

        self.activate(slot, strategy)?;
        Ok(Selection::Started)
    }

    /// Loads a sequence definition into its user placeholder and plays it.
    ///
    /// The slot restarts even if it is already playing, since its contents
    /// were just replaced.
    ///
    /// # Errors
    /// * `NoPlaceholder` - No slot has the payload's label
    /// * `NotAUserSequence` - The label names a built-in sequence
    /// * `CapacityExceeded` - Points or bonus do not fit the slot
    /// * `StrategyUndefined` - The data **was** stored, but playback did not start
    pub fn load_sequence(&mut self, payload: &SequencePayload<'_>) -> Result<Selection, SequencerError> {
        let slot = loader::load_into(&mut self.store, payload)?;
        self.activate(slot, payload.strategy)?;
        Ok(Selection::Started)
    }

    /// Parses a JSON sequence definition and loads it.
    ///
    /// # Errors
    /// `Deserialization` if the JSON is malformed, otherwise as
    /// [`load_sequence`](Self::load_sequence).
    pub fn load_sequence_json(&mut self, json: &[u8]) -> Result<Selection, SequencerError> {
        let payload = loader::parse_payload(json)?;
        self.load_sequence(&payload)
    }

    /// Requests a stop. The next tick turns the strip off and releases the
    /// current sequence.
    pub fn stop(&mut self) {
        if self.cursor.state != PlaybackState::Stopped {
            log::info!("stop requested");
            self.cursor.state = PlaybackState::Stopping;
        }
    }

    /// Handles a collaborator request by dispatching to the matching method.
    ///
    /// # Returns
    /// * `Ok(Some(selection))` - For selections and loads
    /// * `Ok(None)` - For stop
    pub fn handle_command(&mut self, command: SequencerCommand<'_>) -> Result<Option<Selection>, SequencerError> {
        match command {
            SequencerCommand::Select(request) => {
                self.select_sequence(request.label, request.strategy).map(Some)
            }
            SequencerCommand::Load(payload) => self.load_sequence(payload).map(Some),
            SequencerCommand::LoadJson(json) => self.load_sequence_json(json).map(Some),
            SequencerCommand::Stop => {
                self.stop();
                Ok(None)
            }
        }
    }

    /// Points the cursor at `slot` in the START phase.
    fn activate(&mut self, slot: SlotId, strategy: Option<&str>) -> Result<(), SequencerError> {
        let sequence = self.store.get(slot).ok_or(SequencerError::NotFound)?;
        let name = match strategy {
            Some(name) if !name.is_empty() => name,
            _ => sequence.strategy(),
        };

        let id = strategy::resolve(name).inspect_err(|_| {
            log::warn!("{}: strategy {:?} undefined", sequence.label(), name);
        })?;

        log::info!("playing {} with {}", sequence.label(), id.name());
        self.cursor = Cursor {
            selected: Some(slot),
            strategy: id,
            state: PlaybackState::Start,
            clear_on_start: self.cursor.selected.is_some(),
            run: RunState::default(),
        };
        Ok(())
    }

    fn is_playing(&self, slot: SlotId) -> bool {
        self.cursor.selected == Some(slot)
            && !matches!(
                self.cursor.state,
                PlaybackState::Stopping | PlaybackState::Stopped
            )
    }

    /// Returns the current playback phase.
    pub fn state(&self) -> PlaybackState {
        self.cursor.state
    }

    /// Returns the slot being played, if any.
    pub fn current_slot(&self) -> Option<SlotId> {
        self.cursor.selected
    }

    /// Returns the label of the sequence being played, if any.
    pub fn current_label(&self) -> Option<&str> {
        self.cursor
            .selected
            .and_then(|id| self.store.get(id))
            .map(|s| s.label())
    }

    /// Returns the strategy of the sequence being played, if any.
    pub fn current_strategy(&self) -> Option<StrategyId> {
        self.cursor.selected.map(|_| self.cursor.strategy)
    }

    /// Index of the point under the cursor.
    pub fn point_index(&self) -> usize {
        self.cursor.run.point_index
    }

    pub fn store(&self) -> &SequenceStore<SEQS, POINTS> {
        &self.store
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut S {
        &mut self.strip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;
    use crate::time::TimeDuration;
    use crate::types::ColorPoint;
    use core::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestDuration(u64);

    impl TimeDuration for TestDuration {
        fn as_millis(&self) -> u64 {
            self.0
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestInstant(u64);

    impl TimeInstant for TestInstant {
        type Duration = TestDuration;

        fn duration_since(&self, earlier: Self) -> Self::Duration {
            TestDuration(self.0.saturating_sub(earlier.0))
        }
    }

    struct Clock(Cell<u64>);

    impl Clock {
        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl TimeSource<TestInstant> for Clock {
        fn now(&self) -> TestInstant {
            TestInstant(self.0.get())
        }
    }

    /// Single-pixel strip remembering the last rendered color.
    struct OnePixel {
        buffer: Srgb<u8>,
        shown: Srgb<u8>,
        renders: usize,
    }

    impl OnePixel {
        fn new() -> Self {
            Self {
                buffer: Srgb::new(0, 0, 0),
                shown: Srgb::new(0, 0, 0),
                renders: 0,
            }
        }
    }

    impl LedStrip for OnePixel {
        fn set_pixel(&mut self, index: usize, color: Srgb<u8>) {
            if index == 0 {
                self.buffer = color;
            }
        }

        fn render(&mut self) {
            self.shown = self.buffer;
            self.renders += 1;
        }

        fn clear(&mut self) {
            self.buffer = Srgb::new(0, 0, 0);
        }

        fn pixel_count(&self) -> usize {
            1
        }
    }

    fn store() -> SequenceStore<4, 4> {
        let mut store = SequenceStore::new();
        store
            .insert(
                Sequence::builder("AB")
                    .points([
                        ColorPoint::new(10, 0, 0, 0, 100),
                        ColorPoint::new(20, 0, 0, 0, 100),
                        ColorPoint::TERMINATOR,
                    ])
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .unwrap();
        store
            .insert(Sequence::placeholder("USER-1", "points").unwrap())
            .unwrap();
        store
    }

    fn no_random() -> u32 {
        0
    }

    type TestSequencer<'t> = NeoSequencer<'t, TestInstant, OnePixel, Clock, fn() -> u32, 4, 4>;

    #[test]
    fn new_sequencer_is_stopped_and_dark() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());

        assert_eq!(seq.state(), PlaybackState::Stopped);
        assert_eq!(seq.strip().renders, 1);
        assert_eq!(seq.advance(), PlaybackState::Stopped);
        assert_eq!(seq.current_label(), None);
        assert_eq!(seq.current_strategy(), None);
    }

    #[test]
    fn wait_is_a_no_op_until_interval_elapses() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());
        seq.select_sequence("AB", None).unwrap();

        assert_eq!(seq.advance(), PlaybackState::Wait);
        let renders = seq.strip().renders;

        clock.advance(99);
        for _ in 0..10 {
            assert_eq!(seq.advance(), PlaybackState::Wait);
        }
        assert_eq!(seq.strip().renders, renders);
        assert_eq!(seq.point_index(), 0);

        clock.advance(1);
        assert_eq!(seq.advance(), PlaybackState::Write);
        assert_eq!(seq.point_index(), 1);
    }

    #[test]
    fn long_gap_moves_a_single_step() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());
        seq.select_sequence("AB", None).unwrap();
        seq.advance();

        clock.advance(10_000);
        seq.advance();
        seq.advance();
        assert_eq!(seq.point_index(), 1);
        assert_eq!(seq.strip().shown, Srgb::new(20, 0, 0));
        assert_eq!(seq.state(), PlaybackState::Wait);
    }

    #[test]
    fn empty_placeholder_stops_immediately() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());
        seq.select_sequence("USER-1", None).unwrap();

        assert_eq!(seq.advance(), PlaybackState::Stopping);
        assert_eq!(seq.advance(), PlaybackState::Stopped);
        assert_eq!(seq.current_slot(), None);
    }

    #[test]
    fn failed_selection_leaves_cursor_alone() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());
        seq.select_sequence("AB", None).unwrap();
        seq.advance();

        assert_eq!(
            seq.select_sequence("USER-1", Some("sparkle")),
            Err(SequencerError::StrategyUndefined)
        );
        assert_eq!(seq.select_sequence("NOPE", None), Err(SequencerError::NotFound));
        assert_eq!(seq.current_label(), Some("AB"));
        assert_eq!(seq.state(), PlaybackState::Wait);
    }

    #[test]
    fn empty_strategy_name_uses_default() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());

        assert_eq!(seq.select_sequence("AB", Some("")), Ok(Selection::Started));
        assert_eq!(seq.current_strategy(), Some(StrategyId::Points));
    }

    #[test]
    fn stop_when_idle_does_nothing() {
        let clock = Clock(Cell::new(0));
        let mut seq = TestSequencer::new(OnePixel::new(), &clock, no_random, store());
        seq.stop();
        assert_eq!(seq.state(), PlaybackState::Stopped);
    }
}

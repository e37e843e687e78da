//! "slowp": a slow breathing pulse between two endpoint colors.
//!
//! Point 0 is the low endpoint and its `interval_ms` is the length of one
//! sweep in seconds. Point 1 is the high endpoint. Each sweep is split into
//! [`PULSE_STEPS`] steps. The bonus is a signed flicker count: positive
//! values flash full white, negative values flash black, on that many
//! randomly chosen step positions.

use super::Frame;
use crate::colors::{COLOR_OFF, FULL_BRIGHT};
use crate::sequencer::PlaybackState;
use crate::types::ColorPoint;
use heapless::Vec;
use palette::Srgb;

/// Steps in one sweep from one endpoint to the other.
pub const PULSE_STEPS: u16 = 100;

/// Upper bound on the flicker count taken from the bonus.
pub const MAX_FLICKERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Flicker {
    #[default]
    Off,
    Bright,
    Dark,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PulseState {
    level: [f32; 3],
    low: [f32; 3],
    top: [f32; 3],
    delta: [f32; 3],
    step: u16,
    falling: bool,
    step_ms: u64,
    flicker: Flicker,
    flicker_steps: Vec<u16, MAX_FLICKERS>,
}

impl PulseState {
    fn new(low: ColorPoint, high: ColorPoint) -> Self {
        let low = channels(low);
        let high = channels(high);
        let mut top = [0.0; 3];
        let mut delta = [0.0; 3];

        for c in 0..3 {
            top[c] = if high[c] > low[c] { high[c] } else { low[c] };
            delta[c] = (top[c] - low[c]) / f32::from(PULSE_STEPS);
        }

        Self {
            level: low,
            low,
            top,
            delta,
            ..Self::default()
        }
    }

    /// Moves one step, reversing at either endpoint.
    ///
    /// Reaching an endpoint snaps every channel to it exactly, so rounding
    /// error accumulated over the sweep never carries into the next one.
    fn step(&mut self) {
        if self.falling {
            self.step = self.step.saturating_sub(1);
            for c in 0..3 {
                self.level[c] = (self.level[c] - self.delta[c]).max(self.low[c]);
            }
            if self.step == 0 {
                self.level = self.low;
                self.falling = false;
            }
        } else {
            self.step += 1;
            for c in 0..3 {
                self.level[c] = (self.level[c] + self.delta[c]).min(self.top[c]);
            }
            if self.step >= PULSE_STEPS {
                self.level = self.top;
                self.falling = true;
            }
        }
    }

    fn color(&self) -> Srgb<u8> {
        if self.flicker_steps.contains(&self.step) {
            match self.flicker {
                Flicker::Bright => return FULL_BRIGHT,
                Flicker::Dark => return COLOR_OFF,
                Flicker::Off => {}
            }
        }
        Srgb::new(
            to_channel(self.level[0]),
            to_channel(self.level[1]),
            to_channel(self.level[2]),
        )
    }
}

pub(crate) fn start(frame: &mut Frame<'_>, clear: bool) -> PlaybackState {
    if clear {
        frame.strip.clear();
    }

    let low = frame.point(0);
    if frame.points.len() < 2 || low.is_terminator() {
        log::warn!("slowp needs a low and a high point, stopping");
        return PlaybackState::Stopping;
    }

    let mut pulse = PulseState::new(low, frame.point(1));
    pulse.step_ms = low_hold_secs_to_step_ms(low.hold_ms());

    let (flicker, count) = parse_flicker(frame.bonus);
    pulse.flicker = flicker;
    pulse.flicker_steps = core::iter::repeat_with(|| {
        (frame.random.next_u32() % u32::from(PULSE_STEPS)) as u16
    })
    .take(count.min(MAX_FLICKERS))
    .collect();
    log::debug!(
        "slowp: {} ms per step, {} flicker(s) {:?}",
        pulse.step_ms,
        count,
        flicker
    );

    let color = pulse.color();
    frame.run.pulse = pulse;
    frame.fill(color);
    frame.mark();
    PlaybackState::Wait
}

pub(crate) fn wait(frame: &mut Frame<'_>) -> PlaybackState {
    if frame.elapsed_ms() < frame.run.pulse.step_ms {
        PlaybackState::Wait
    } else {
        PlaybackState::Write
    }
}

pub(crate) fn write(frame: &mut Frame<'_>) -> PlaybackState {
    frame.run.pulse.step();
    let color = frame.run.pulse.color();
    frame.fill(color);
    frame.mark();
    PlaybackState::Wait
}

fn low_hold_secs_to_step_ms(secs: u64) -> u64 {
    secs * 1000 / u64::from(PULSE_STEPS)
}

/// Splits a signed flicker count into polarity and capped magnitude.
fn parse_flicker(bonus: &str) -> (Flicker, usize) {
    let n = bonus.trim().parse::<i32>().unwrap_or(0);
    let flicker = match n {
        0 => Flicker::Off,
        n if n > 0 => Flicker::Bright,
        _ => Flicker::Dark,
    };
    let count = usize::try_from(n.unsigned_abs())
        .unwrap_or(MAX_FLICKERS)
        .min(MAX_FLICKERS);
    (flicker, count)
}

fn channels(point: ColorPoint) -> [f32; 3] {
    [
        f32::from(point.red),
        f32::from(point.green),
        f32::from(point.blue),
    ]
}

fn to_channel(level: f32) -> u8 {
    (level + 0.5).clamp(0.0, 255.0) as u8
}
